//! Pricing inputs: transportation bookings and parcel deliveries.
//!
//! These are the structured records handed to the rate calculators in
//! [`crate::pricing`].

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PlatformError, PlatformResult};
use crate::pricing::{MAX_AMOUNT, MAX_MEASURE, checked_product, ensure_at_most};

/// A truck or van booking to be priced.
///
/// # Example
///
/// ```
/// use bizhub::models::TransportationBooking;
///
/// let booking: TransportationBooking = serde_json::from_str(r#"{
///     "vehicle_type": "van",
///     "distance_km": "12.5",
///     "pickup_at": "2026-10-14T10:00:00"
/// }"#).unwrap();
/// assert!(!booking.urgent);
/// assert_eq!(booking.additional_stops, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportationBooking {
    /// Vehicle type code, looked up in the tenant's rate table.
    pub vehicle_type: String,
    /// Route distance in kilometres.
    pub distance_km: Decimal,
    /// Cargo weight in kilograms.
    #[serde(default)]
    pub cargo_weight_kg: Decimal,
    /// Drop-off stops beyond the final destination.
    #[serde(default)]
    pub additional_stops: u32,
    /// Scheduled pickup time (tenant local time).
    pub pickup_at: NaiveDateTime,
    /// Whether the customer asked for urgent dispatch.
    #[serde(default)]
    pub urgent: bool,
}

impl TransportationBooking {
    /// Checks field-level constraints the JSON schema cannot express.
    pub fn validate(&self) -> PlatformResult<()> {
        measure("distance_km", self.distance_km)?;
        measure("cargo_weight_kg", self.cargo_weight_kg)?;
        Ok(())
    }
}

/// Outer parcel dimensions in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Length in centimetres.
    pub length: Decimal,
    /// Width in centimetres.
    pub width: Decimal,
    /// Height in centimetres.
    pub height: Decimal,
}

impl Dimensions {
    /// Volume in cubic centimetres.
    pub fn volume(&self) -> PlatformResult<Decimal> {
        checked_product("dimensions_cm", self.length, self.width)
            .and_then(|area| checked_product("dimensions_cm", area, self.height))
    }
}

/// A parcel to be priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParcelDelivery {
    /// Service level code (e.g. "standard", "express").
    pub service_level: String,
    /// Actual weight in kilograms.
    pub weight_kg: Decimal,
    /// Outer dimensions, used for volumetric weight.
    #[serde(default)]
    pub dimensions_cm: Option<Dimensions>,
    /// Route distance in kilometres.
    pub distance_km: Decimal,
    /// Scheduled pickup time (tenant local time).
    pub pickup_at: NaiveDateTime,
    /// Whether the customer asked for urgent handling.
    #[serde(default)]
    pub urgent: bool,
    /// Whether the parcel needs fragile handling.
    #[serde(default)]
    pub fragile: bool,
    /// Declared value for insurance.
    #[serde(default)]
    pub declared_value: Option<Decimal>,
}

impl ParcelDelivery {
    /// Checks field-level constraints the JSON schema cannot express.
    pub fn validate(&self) -> PlatformResult<()> {
        measure("weight_kg", self.weight_kg)?;
        measure("distance_km", self.distance_km)?;
        if let Some(dims) = &self.dimensions_cm {
            for (field, value) in [
                ("dimensions_cm.length", dims.length),
                ("dimensions_cm.width", dims.width),
                ("dimensions_cm.height", dims.height),
            ] {
                positive(field, value)?;
                ensure_at_most(field, value, MAX_MEASURE)?;
            }
        }
        if let Some(value) = self.declared_value {
            positive("declared_value", value)?;
            ensure_at_most("declared_value", value, MAX_AMOUNT)?;
        }
        Ok(())
    }
}

fn measure(field: &str, value: Decimal) -> PlatformResult<()> {
    if value < Decimal::ZERO {
        return Err(PlatformError::validation(field, "must not be negative"));
    }
    ensure_at_most(field, value, MAX_MEASURE)
}

fn positive(field: &str, value: Decimal) -> PlatformResult<()> {
    if value <= Decimal::ZERO {
        return Err(PlatformError::validation(field, "must be greater than zero"));
    }
    Ok(())
}
