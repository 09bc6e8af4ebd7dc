//! Money rounding helpers.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{PlatformError, PlatformResult};

/// Largest distance, weight or dimension accepted on a pricing request.
pub const MAX_MEASURE: i64 = 1_000_000;

/// Largest money amount accepted from a request or a rate table.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Rounds an amount to two decimal places, midpoint away from zero, and
/// fixes the scale at 2 so it serializes as e.g. `"500.00"`.
///
/// # Example
///
/// ```
/// use bizhub::pricing::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("324.6425").unwrap()).to_string(), "324.64");
/// assert_eq!(round_money(Decimal::from_str("0.125").unwrap()).to_string(), "0.13");
/// assert_eq!(round_money(Decimal::from(500)).to_string(), "500.00");
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Returns `percent`% of `amount`, rounded to money precision.
pub fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    round_money(amount * percent / Decimal::ONE_HUNDRED)
}

/// Rejects `value` when it exceeds `limit`.
pub fn ensure_at_most(field: &str, value: Decimal, limit: i64) -> PlatformResult<()> {
    if value > Decimal::from(limit) {
        return Err(PlatformError::validation(
            field,
            format!("must not exceed {}", limit),
        ));
    }
    Ok(())
}

/// `a + b`, or a validation error on `field` when the sum overflows.
pub fn checked_sum(field: &str, a: Decimal, b: Decimal) -> PlatformResult<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| PlatformError::validation(field, "is too large"))
}

/// `a × b`, or a validation error on `field` when the product overflows.
pub fn checked_product(field: &str, a: Decimal, b: Decimal) -> PlatformResult<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| PlatformError::validation(field, "is too large"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_money_midpoint_away_from_zero() {
        assert_eq!(round_money(dec("2.345")), dec("2.35"));
        assert_eq!(round_money(dec("-2.345")), dec("-2.35"));
        assert_eq!(round_money(dec("2.344")), dec("2.34"));
    }

    #[test]
    fn test_round_money_pads_scale() {
        assert_eq!(round_money(dec("7")).to_string(), "7.00");
        assert_eq!(round_money(dec("7.5")).to_string(), "7.50");
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(dec("600.00"), dec("15")), dec("90.00"));
        assert_eq!(percent_of(dec("179.00"), dec("25")), dec("44.75"));
        assert_eq!(percent_of(dec("1000"), dec("1.5")), dec("15.00"));
        assert_eq!(percent_of(dec("10.01"), dec("50")), dec("5.01"));
    }

    #[test]
    fn test_limits() {
        assert!(ensure_at_most("weight_kg", Decimal::from(MAX_MEASURE), MAX_MEASURE).is_ok());
        match ensure_at_most("weight_kg", dec("1000000.01"), MAX_MEASURE) {
            Err(PlatformError::Validation { field, message }) => {
                assert_eq!(field, "weight_kg");
                assert_eq!(message, "must not exceed 1000000");
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        assert_eq!(checked_sum("amount", dec("1.50"), dec("2.25")).unwrap(), dec("3.75"));
        assert!(checked_sum("amount", Decimal::MAX, Decimal::ONE).is_err());
        assert_eq!(checked_product("x", dec("2"), dec("3.5")).unwrap(), dec("7.0"));
        match checked_product("dimensions_cm", Decimal::MAX, dec("2")) {
            Err(PlatformError::Validation { field, message }) => {
                assert_eq!(field, "dimensions_cm");
                assert_eq!(message, "is too large");
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }
}
