//! Line-item totals for patient bills and F&B orders.

use rust_decimal::Decimal;

use crate::error::{PlatformError, PlatformResult};
use crate::models::{BillItem, OrderItem};
use crate::pricing::{MAX_AMOUNT, checked_sum, ensure_at_most, round_money};

/// A priced line: quantity and unit price.
pub trait LineItem {
    /// Units ordered.
    fn quantity(&self) -> u32;
    /// Price per unit.
    fn unit_price(&self) -> Decimal;
}

impl LineItem for BillItem {
    fn quantity(&self) -> u32 {
        self.quantity
    }
    fn unit_price(&self) -> Decimal {
        self.unit_price
    }
}

impl LineItem for OrderItem {
    fn quantity(&self) -> u32 {
        self.quantity
    }
    fn unit_price(&self) -> Decimal {
        self.unit_price
    }
}

/// Returns `quantity × unit_price` at money precision.
pub fn line_total(quantity: u32, unit_price: Decimal) -> Option<Decimal> {
    Decimal::from(quantity).checked_mul(unit_price).map(round_money)
}

/// Validates a list of items and returns the sum of line totals.
///
/// Errors name the offending item, e.g. `items.2.quantity`.
///
/// # Example
///
/// ```
/// use bizhub::models::OrderItem;
/// use bizhub::rules::items_total;
/// use rust_decimal::Decimal;
///
/// let items = vec![
///     OrderItem { name: "Adobo".into(), quantity: 2, unit_price: Decimal::new(18000, 2) },
///     OrderItem { name: "Rice".into(), quantity: 3, unit_price: Decimal::new(2500, 2) },
/// ];
/// assert_eq!(items_total(&items).unwrap(), Decimal::new(43500, 2));
/// ```
pub fn items_total<T: LineItem>(items: &[T]) -> PlatformResult<Decimal> {
    if items.is_empty() {
        return Err(PlatformError::validation("items", "must contain at least one item"));
    }

    let mut total = round_money(Decimal::ZERO);
    for (index, item) in items.iter().enumerate() {
        if item.quantity() == 0 {
            return Err(PlatformError::validation(
                format!("items.{}.quantity", index),
                "must be at least 1",
            ));
        }
        let price_field = format!("items.{}.unit_price", index);
        if item.unit_price() < Decimal::ZERO {
            return Err(PlatformError::validation(price_field, "must not be negative"));
        }
        ensure_at_most(&price_field, item.unit_price(), MAX_AMOUNT)?;

        let line = line_total(item.quantity(), item.unit_price())
            .ok_or_else(|| PlatformError::validation(price_field, "is too large"))?;
        total = checked_sum("items", total, line)?;
    }
    ensure_at_most("items", total, MAX_AMOUNT)?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn bill_item(quantity: u32, price: &str) -> BillItem {
        BillItem {
            description: "Cleaning".to_string(),
            quantity,
            unit_price: dec(price),
        }
    }

    #[test]
    fn test_line_total_rounds() {
        assert_eq!(line_total(3, dec("33.333")).unwrap(), dec("100.00"));
        assert_eq!(line_total(1, dec("0")).unwrap().to_string(), "0.00");
        assert!(line_total(u32::MAX, Decimal::MAX).is_none());
    }

    #[test]
    fn test_items_total() {
        let items = vec![bill_item(1, "1500.00"), bill_item(2, "250.50")];
        assert_eq!(items_total(&items).unwrap(), dec("2001.00"));
    }

    #[test]
    fn test_empty_items_rejected() {
        let items: Vec<BillItem> = vec![];
        match items_total(&items) {
            Err(PlatformError::Validation { field, .. }) => assert_eq!(field, "items"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_quantity_names_item() {
        let items = vec![bill_item(1, "10"), bill_item(0, "10")];
        match items_total(&items) {
            Err(PlatformError::Validation { field, .. }) => assert_eq!(field, "items.1.quantity"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_price_rejected() {
        let items = vec![bill_item(1, "-0.01")];
        match items_total(&items) {
            Err(PlatformError::Validation { field, .. }) => assert_eq!(field, "items.0.unit_price"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_price_is_a_field_error() {
        let items = vec![bill_item(1, "10"), bill_item(2, "79228162514264337593543950335")];
        match items_total(&items) {
            Err(PlatformError::Validation { field, .. }) => assert_eq!(field, "items.1.unit_price"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_total_above_limit_is_rejected() {
        let items = vec![bill_item(u32::MAX, "1000000000000")];
        match items_total(&items) {
            Err(PlatformError::Validation { field, message }) => {
                assert_eq!(field, "items");
                assert_eq!(message, "must not exceed 1000000000000");
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }
}
