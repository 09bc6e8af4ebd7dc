//! Food and beverage records: POS orders and table reservations.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tenant::{has_status, tenant_scoped};
use super::Dated;

/// One line on a POS order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Menu item name.
    pub name: String,
    /// Number of portions.
    pub quantity: u32,
    /// Price per portion.
    pub unit_price: Decimal,
}

/// Lifecycle of a POS order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Being served.
    Open,
    /// Settled.
    Completed,
    /// Voided.
    Cancelled,
}

/// A point-of-sale order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FnbOrder {
    /// Unique identifier for the order.
    pub id: Uuid,
    /// The owning tenant.
    pub client_identifier: String,
    /// Generated order number.
    pub order_number: String,
    /// Table the order was placed from, if dine-in.
    #[serde(default)]
    pub table_label: Option<String>,
    /// Ordered items.
    pub items: Vec<OrderItem>,
    /// Order total.
    pub total: Decimal,
    /// Order status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

impl Dated for FnbOrder {
    fn record_date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

/// Status of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// The table is held.
    Confirmed,
    /// The guest cancelled.
    Cancelled,
}

/// A table reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Unique identifier for the reservation.
    pub id: Uuid,
    /// The owning tenant.
    pub client_identifier: String,
    /// Name the table is held under.
    pub guest_name: String,
    /// Number of guests.
    pub party_size: u32,
    /// Reservation date.
    pub reserved_for: NaiveDate,
    /// Arrival time.
    pub reserved_time: NaiveTime,
    /// Reservation status.
    pub status: ReservationStatus,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl Dated for Reservation {
    fn record_date(&self) -> NaiveDate {
        self.reserved_for
    }
}

tenant_scoped!(FnbOrder, Reservation);
has_status!(FnbOrder => OrderStatus, Reservation => ReservationStatus);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_serialization() {
        assert_eq!(serde_json::to_string(&OrderStatus::Open).unwrap(), "\"open\"");
        assert_eq!(
            serde_json::to_string(&OrderStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }

    #[test]
    fn test_order_is_dated_by_creation_day() {
        let order = FnbOrder {
            id: Uuid::new_v4(),
            client_identifier: "corner-bistro".to_string(),
            order_number: "CB-20261015-0001".to_string(),
            table_label: Some("T4".to_string()),
            items: vec![],
            total: Decimal::ZERO,
            status: OrderStatus::Open,
            created_at: "2026-10-15T23:30:00Z".parse().unwrap(),
        };
        assert_eq!(
            order.record_date(),
            NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
        );
    }

    #[test]
    fn test_deserialize_reservation() {
        let json = r#"{
            "id": "0b8f3c5e-1d2a-4c6b-8e9f-a1b2c3d4e5f6",
            "client_identifier": "corner-bistro",
            "guest_name": "Dela Cruz",
            "party_size": 4,
            "reserved_for": "2026-10-20",
            "reserved_time": "19:30:00",
            "status": "confirmed"
        }"#;
        let reservation: Reservation = serde_json::from_str(json).unwrap();
        assert_eq!(reservation.party_size, 4);
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
        assert!(reservation.notes.is_none());
    }
}
