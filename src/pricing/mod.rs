//! Rate calculators for the logistics modules.
//!
//! This module contains money rounding, surcharge detection and
//! application, the minimum-charge floor, and the two quote calculators
//! built from them: transportation bookings and parcel deliveries.

mod minimum_charge;
mod money;
mod parcel_delivery;
mod surcharge_detection;
mod surcharges;
mod transportation;

pub use minimum_charge::{MinimumChargeResult, apply_minimum_charge};
pub use money::{
    MAX_AMOUNT, MAX_MEASURE, checked_product, checked_sum, ensure_at_most, percent_of, round_money,
};
pub use parcel_delivery::{ChargeableWeight, calculate_parcel_delivery_cost, chargeable_weight};
pub use surcharge_detection::{SurchargeDetection, detect_surcharges, is_peak_hour, is_weekend};
pub use surcharges::{SurchargeResult, apply_surcharges, surcharge_percent};
pub use transportation::{
    TransportationComponents, calculate_transportation_cost, transportation_components,
};

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::config::{ConfigLoader, TenantConfig};
    use crate::models::{ParcelDelivery, TransportationBooking};
    use chrono::{NaiveDate, NaiveDateTime};
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn tenant() -> TenantConfig {
        ConfigLoader::load("config/default")
            .unwrap()
            .tenant("acme-logistics")
            .unwrap()
            .clone()
    }

    fn pickup(day: u32, minute_of_day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 12, day)
            .unwrap()
            .and_hms_opt(minute_of_day / 60, minute_of_day % 60, 0)
            .unwrap()
    }

    proptest! {
        #[test]
        fn transportation_total_is_floored_and_sums(
            vehicle in prop::sample::select(vec!["motorcycle", "van", "small_truck", "large_truck"]),
            km_cents in 0u32..50_000,
            kg_cents in 0u32..500_000,
            stops in 0u32..6,
            day in 20u32..32,
            minute in 0u32..1440,
            urgent in any::<bool>(),
        ) {
            let tenant = tenant();
            let booking = TransportationBooking {
                vehicle_type: vehicle.to_string(),
                distance_km: Decimal::new(km_cents as i64, 2),
                cargo_weight_kg: Decimal::new(kg_cents as i64, 2),
                additional_stops: stops,
                pickup_at: pickup(day, minute),
                urgent,
            };

            let quote = calculate_transportation_cost(&booking, &tenant).unwrap();
            let b = &quote.breakdown;

            prop_assert!(quote.total >= Decimal::from(500));
            prop_assert_eq!(quote.total.scale(), 2);
            let surcharge_sum: Decimal = crate::models::SurchargeKind::ALL
                .iter()
                .map(|k| b[k.breakdown_key()])
                .sum();
            prop_assert_eq!(
                b["subtotal"] + surcharge_sum + b["minimum_charge_adjustment"],
                quote.total
            );
        }

        #[test]
        fn parcel_charged_on_heavier_weight(
            kg_cents in 1u32..5_000,
            side in 1u32..80,
            km in 0u32..200,
            fragile in any::<bool>(),
        ) {
            let tenant = tenant();
            let parcel = ParcelDelivery {
                service_level: "standard".to_string(),
                weight_kg: Decimal::new(kg_cents as i64, 2),
                dimensions_cm: Some(crate::models::Dimensions {
                    length: Decimal::from(side),
                    width: Decimal::from(side),
                    height: Decimal::from(side),
                }),
                distance_km: Decimal::from(km),
                pickup_at: pickup(14, 600),
                urgent: false,
                fragile,
                declared_value: None,
            };

            let quote = calculate_parcel_delivery_cost(&parcel, &tenant).unwrap();
            let b = &quote.breakdown;

            prop_assert!(b["chargeable_weight_kg"] >= b["actual_weight_kg"]);
            prop_assert!(b["chargeable_weight_kg"] >= b["volumetric_weight_kg"]);
            prop_assert!(quote.total >= Decimal::from(60));
        }
    }
}
