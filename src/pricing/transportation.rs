//! Transportation booking pricing.
//!
//! Prices a truck or van booking from the tenant's transportation rate
//! table:
//!
//! ```text
//! rate_subtotal = (base_rate + distance_km × per_km + cargo_kg × per_kg) × multiplier
//! subtotal      = rate_subtotal + additional_stops × per_stop_fee
//! total         = max(subtotal + Σ surcharge% × subtotal, minimum_charge)
//! ```

use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::time::Instant;
use uuid::Uuid;

use crate::config::{TenantConfig, VehicleRate};
use crate::error::{PlatformError, PlatformResult};
use crate::models::{AuditStep, AuditTrace, PricingQuote, PricingService, SurchargeKind, TransportationBooking};

use super::minimum_charge::apply_minimum_charge;
use super::money::{MAX_AMOUNT, checked_product, checked_sum, ensure_at_most, round_money};
use super::surcharge_detection::detect_surcharges;
use super::surcharges::apply_surcharges;

/// Component costs of a booking before surcharges.
#[derive(Debug, Clone)]
pub struct TransportationComponents {
    /// The vehicle's flat base rate.
    pub base_cost: Decimal,
    /// Distance component.
    pub distance_cost: Decimal,
    /// Cargo weight component.
    pub weight_cost: Decimal,
    /// The vehicle multiplier.
    pub multiplier: Decimal,
    /// `(base + distance + weight) × multiplier`.
    pub rate_subtotal: Decimal,
    /// Additional stop fees.
    pub stops_cost: Decimal,
    /// `rate_subtotal + stops_cost`.
    pub subtotal: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes the pre-surcharge components of a booking.
pub fn transportation_components(
    booking: &TransportationBooking,
    vehicle: &VehicleRate,
    per_stop_fee: Decimal,
    step_number: u32,
) -> PlatformResult<TransportationComponents> {
    let base_cost = round_money(vehicle.base_rate);
    let distance_cost = round_money(checked_product("distance_km", booking.distance_km, vehicle.per_km)?);
    let weight_cost = round_money(checked_product(
        "cargo_weight_kg",
        booking.cargo_weight_kg,
        vehicle.per_kg,
    )?);
    let components = checked_sum("total", base_cost, distance_cost)
        .and_then(|sum| checked_sum("total", sum, weight_cost))?;
    let rate_subtotal = round_money(checked_product("total", components, vehicle.multiplier)?);
    let stops_cost = round_money(checked_product(
        "additional_stops",
        Decimal::from(booking.additional_stops),
        per_stop_fee,
    )?);
    let subtotal = checked_sum("total", rate_subtotal, stops_cost)?;
    ensure_at_most("total", subtotal, MAX_AMOUNT)?;

    let audit_step = AuditStep {
        step_number,
        rule_id: "transportation_components".to_string(),
        rule_name: "Transportation Base Cost".to_string(),
        input: serde_json::json!({
            "distance_km": booking.distance_km.normalize().to_string(),
            "cargo_weight_kg": booking.cargo_weight_kg.normalize().to_string(),
            "additional_stops": booking.additional_stops,
            "base_rate": vehicle.base_rate.normalize().to_string(),
            "per_km": vehicle.per_km.normalize().to_string(),
            "per_kg": vehicle.per_kg.normalize().to_string(),
            "multiplier": vehicle.multiplier.normalize().to_string(),
            "per_stop_fee": per_stop_fee.normalize().to_string()
        }),
        output: serde_json::json!({
            "base_cost": base_cost.to_string(),
            "distance_cost": distance_cost.to_string(),
            "weight_cost": weight_cost.to_string(),
            "rate_subtotal": rate_subtotal.to_string(),
            "stops_cost": stops_cost.to_string(),
            "subtotal": subtotal.to_string()
        }),
        reasoning: format!(
            "(${} + {} km × ${} + {} kg × ${}) × {} = ${}; {} stops × ${} = ${}; subtotal ${}",
            base_cost,
            booking.distance_km.normalize(),
            vehicle.per_km.normalize(),
            booking.cargo_weight_kg.normalize(),
            vehicle.per_kg.normalize(),
            vehicle.multiplier.normalize(),
            rate_subtotal,
            booking.additional_stops,
            per_stop_fee.normalize(),
            stops_cost,
            subtotal
        ),
    };

    Ok(TransportationComponents {
        base_cost,
        distance_cost,
        weight_cost,
        multiplier: vehicle.multiplier,
        rate_subtotal,
        stops_cost,
        subtotal,
        audit_step,
    })
}

/// Prices a transportation booking for a tenant.
///
/// # Returns
///
/// Returns a [`PricingQuote`] whose breakdown holds `base_cost`,
/// `distance_cost`, `weight_cost`, `vehicle_multiplier`, `rate_subtotal`,
/// `stops_cost`, `subtotal`, one key per surcharge kind (zero when not
/// applicable), `minimum_charge_adjustment` and `total`, or an error if:
/// - The booking fails validation (`Validation`)
/// - The tenant has no transportation rates (`ModuleNotConfigured`)
/// - The vehicle type has no rate row (`RateNotFound`)
///
/// # Examples
///
/// ```no_run
/// use bizhub::config::ConfigLoader;
/// use bizhub::models::TransportationBooking;
/// use bizhub::pricing::calculate_transportation_cost;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("config/default").unwrap();
/// let tenant = loader.tenant("acme-logistics").unwrap();
/// let booking: TransportationBooking = serde_json::from_str(r#"{
///     "vehicle_type": "van",
///     "distance_km": "10",
///     "cargo_weight_kg": "100",
///     "pickup_at": "2026-10-14T10:00:00"
/// }"#).unwrap();
///
/// let quote = calculate_transportation_cost(&booking, tenant).unwrap();
/// // 300 + 10 × 15 + 100 × 0.50 = 500.00
/// assert_eq!(quote.total, Decimal::from(500));
/// ```
pub fn calculate_transportation_cost(
    booking: &TransportationBooking,
    tenant: &TenantConfig,
) -> PlatformResult<PricingQuote> {
    let started = Instant::now();
    booking.validate()?;

    let rates = tenant.transportation_rates()?;
    let mut trace = AuditTrace::default();

    let vehicle = rates
        .vehicles
        .get(&booking.vehicle_type)
        .ok_or_else(|| PlatformError::RateNotFound {
            field: "vehicle_type".to_string(),
            kind: "vehicle".to_string(),
            code: booking.vehicle_type.clone(),
        })?;

    trace.steps.push(AuditStep {
        step_number: trace.next_step(),
        rule_id: "vehicle_rate_lookup".to_string(),
        rule_name: "Vehicle Rate Lookup".to_string(),
        input: serde_json::json!({
            "client_identifier": tenant.client_identifier,
            "vehicle_type": booking.vehicle_type
        }),
        output: serde_json::json!({
            "base_rate": vehicle.base_rate.to_string(),
            "per_km": vehicle.per_km.to_string(),
            "per_kg": vehicle.per_kg.to_string(),
            "multiplier": vehicle.multiplier.to_string()
        }),
        reasoning: format!(
            "Using '{}' rates from {}'s transportation table",
            booking.vehicle_type, tenant.name
        ),
    });

    let components =
        transportation_components(booking, vehicle, rates.per_stop_fee, trace.next_step())?;
    trace.steps.push(components.audit_step.clone());

    let detection = detect_surcharges(
        booking.pickup_at,
        booking.urgent,
        &rates.surcharges,
        tenant.is_holiday(booking.pickup_at.date()),
        trace.next_step(),
    );
    trace.steps.push(detection.audit_step);

    let surcharges = apply_surcharges(
        components.subtotal,
        &detection.kinds,
        &rates.surcharges,
        trace.next_step(),
    );
    trace.steps.push(surcharges.audit_step.clone());

    let floor = apply_minimum_charge(
        components.subtotal + surcharges.total,
        rates.minimum_charge,
        trace.next_step(),
    );
    trace.steps.push(floor.audit_step.clone());

    let mut breakdown = BTreeMap::new();
    breakdown.insert("base_cost".to_string(), components.base_cost);
    breakdown.insert("distance_cost".to_string(), components.distance_cost);
    breakdown.insert("weight_cost".to_string(), components.weight_cost);
    breakdown.insert("vehicle_multiplier".to_string(), components.multiplier);
    breakdown.insert("rate_subtotal".to_string(), components.rate_subtotal);
    breakdown.insert("stops_cost".to_string(), components.stops_cost);
    breakdown.insert("subtotal".to_string(), components.subtotal);
    insert_surcharges(&mut breakdown, &surcharges.amounts);
    breakdown.insert("minimum_charge_adjustment".to_string(), floor.adjustment);
    breakdown.insert("total".to_string(), floor.charged);

    trace.duration_us = started.elapsed().as_micros() as u64;

    Ok(PricingQuote {
        quote_id: Uuid::new_v4(),
        quoted_at: Utc::now(),
        client_identifier: tenant.client_identifier.clone(),
        service: PricingService::Transportation,
        currency: tenant.currency.clone(),
        breakdown,
        applied_surcharges: detection.kinds,
        minimum_charge_applied: floor.applied,
        total: floor.charged,
        audit_trace: trace,
    })
}

/// Writes every surcharge key into a breakdown, zero when not applicable.
pub(crate) fn insert_surcharges(
    breakdown: &mut BTreeMap<String, Decimal>,
    amounts: &BTreeMap<SurchargeKind, Decimal>,
) {
    for kind in SurchargeKind::ALL {
        let amount = amounts
            .get(&kind)
            .copied()
            .unwrap_or_else(|| round_money(Decimal::ZERO));
        breakdown.insert(kind.breakdown_key().to_string(), amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use chrono::NaiveDateTime;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn load_tenant() -> TenantConfig {
        ConfigLoader::load("config/default")
            .expect("Failed to load config")
            .tenant("acme-logistics")
            .expect("Missing tenant")
            .clone()
    }

    fn booking(vehicle: &str, km: &str, kg: &str, pickup: &str) -> TransportationBooking {
        TransportationBooking {
            vehicle_type: vehicle.to_string(),
            distance_km: dec(km),
            cargo_weight_kg: dec(kg),
            additional_stops: 0,
            pickup_at: NaiveDateTime::parse_from_str(pickup, "%Y-%m-%d %H:%M:%S").unwrap(),
            urgent: false,
        }
    }

    // ==========================================================================
    // Off-peak weekday van booking
    // ==========================================================================
    #[test]
    fn test_weekday_van_booking() {
        let tenant = load_tenant();
        let booking = booking("van", "10", "100", "2026-10-14 10:00:00");

        let quote = calculate_transportation_cost(&booking, &tenant).unwrap();

        // 300 + 10 * 15 + 100 * 0.50 = 500.00
        assert_eq!(quote.breakdown["base_cost"], dec("300.00"));
        assert_eq!(quote.breakdown["distance_cost"], dec("150.00"));
        assert_eq!(quote.breakdown["weight_cost"], dec("50.00"));
        assert_eq!(quote.breakdown["subtotal"], dec("500.00"));
        assert_eq!(quote.total, dec("500.00"));
        assert!(quote.applied_surcharges.is_empty());
        assert!(!quote.minimum_charge_applied);
        assert_eq!(quote.currency, "PHP");
        assert_eq!(quote.service, PricingService::Transportation);
    }

    // ==========================================================================
    // Saturday peak-hour urgent booking
    // ==========================================================================
    #[test]
    fn test_saturday_peak_urgent_booking_stacks_surcharges() {
        let tenant = load_tenant();
        let mut booking = booking("van", "20", "0", "2026-10-17 08:00:00");
        booking.urgent = true;

        let quote = calculate_transportation_cost(&booking, &tenant).unwrap();

        // subtotal 300 + 300 = 600; peak 15% = 90, weekend 10% = 60, urgent 20% = 120
        assert_eq!(quote.breakdown["subtotal"], dec("600.00"));
        assert_eq!(quote.breakdown["peak_hour_surcharge"], dec("90.00"));
        assert_eq!(quote.breakdown["weekend_surcharge"], dec("60.00"));
        assert_eq!(quote.breakdown["holiday_surcharge"], Decimal::ZERO);
        assert_eq!(quote.breakdown["urgent_surcharge"], dec("120.00"));
        assert_eq!(quote.total, dec("870.00"));
        assert_eq!(
            quote.applied_surcharges,
            vec![SurchargeKind::PeakHour, SurchargeKind::Weekend, SurchargeKind::Urgent]
        );
    }

    #[test]
    fn test_holiday_surcharge() {
        let tenant = load_tenant();
        // 2026-12-25 is a Friday and a configured holiday
        let booking = booking("van", "10", "0", "2026-12-25 10:00:00");

        let quote = calculate_transportation_cost(&booking, &tenant).unwrap();

        // 450 + 25% = 562.50
        assert_eq!(quote.breakdown["holiday_surcharge"], dec("112.50"));
        assert_eq!(quote.total, dec("562.50"));
        assert_eq!(quote.applied_surcharges, vec![SurchargeKind::Holiday]);
    }

    #[test]
    fn test_multiplier_and_stops() {
        let tenant = load_tenant();
        let mut booking = booking("small_truck", "10", "500", "2026-10-14 10:00:00");
        booking.additional_stops = 2;

        let quote = calculate_transportation_cost(&booking, &tenant).unwrap();

        // (800 + 220 + 200) * 1.10 = 1342.00; 2 stops * 50 = 100
        assert_eq!(quote.breakdown["rate_subtotal"], dec("1342.00"));
        assert_eq!(quote.breakdown["stops_cost"], dec("100.00"));
        assert_eq!(quote.breakdown["vehicle_multiplier"], dec("1.10"));
        assert_eq!(quote.total, dec("1442.00"));
    }

    #[test]
    fn test_minimum_charge_floor() {
        let tenant = load_tenant();
        let booking = booking("motorcycle", "5", "0", "2026-10-14 10:00:00");

        let quote = calculate_transportation_cost(&booking, &tenant).unwrap();

        // 80 + 40 = 120, raised to 500
        assert!(quote.minimum_charge_applied);
        assert_eq!(quote.breakdown["minimum_charge_adjustment"], dec("380.00"));
        assert_eq!(quote.total, dec("500.00"));
        assert_eq!(quote.breakdown["total"], quote.total);
    }

    #[test]
    fn test_unknown_vehicle_type() {
        let tenant = load_tenant();
        let booking = booking("hovercraft", "5", "0", "2026-10-14 10:00:00");

        match calculate_transportation_cost(&booking, &tenant) {
            Err(PlatformError::RateNotFound { field, code, .. }) => {
                assert_eq!(field, "vehicle_type");
                assert_eq!(code, "hovercraft");
            }
            other => panic!("Expected RateNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_rate_overflow_is_a_field_error() {
        let mut tenant = load_tenant();
        let rates = tenant.transportation.as_mut().unwrap();
        let van = rates.vehicles.get_mut("van").unwrap();
        van.per_km = Decimal::MAX;

        let booking = booking("van", "1000", "0", "2026-10-14 10:00:00");
        match calculate_transportation_cost(&booking, &tenant) {
            Err(PlatformError::Validation { field, message }) => {
                assert_eq!(field, "distance_km");
                assert_eq!(message, "is too large");
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_subtotal_above_limit_is_rejected() {
        let mut tenant = load_tenant();
        let rates = tenant.transportation.as_mut().unwrap();
        rates.vehicles.get_mut("large_truck").unwrap().per_km = Decimal::from(MAX_AMOUNT);

        let booking = booking("large_truck", "1000000", "0", "2026-10-14 10:00:00");
        assert!(booking.validate().is_ok());
        match calculate_transportation_cost(&booking, &tenant) {
            Err(PlatformError::Validation { field, .. }) => assert_eq!(field, "total"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_tenant_without_transportation_module() {
        let loader = ConfigLoader::load("config/default").unwrap();
        let clinic = loader.tenant("smile-dental").unwrap();
        let booking = booking("van", "5", "0", "2026-10-14 10:00:00");

        assert!(matches!(
            calculate_transportation_cost(&booking, clinic),
            Err(PlatformError::ModuleNotConfigured { .. })
        ));
    }

    #[test]
    fn test_negative_weight_fails_validation() {
        let tenant = load_tenant();
        let booking = booking("van", "5", "-1", "2026-10-14 10:00:00");

        assert!(matches!(
            calculate_transportation_cost(&booking, &tenant),
            Err(PlatformError::Validation { .. })
        ));
    }

    #[test]
    fn test_audit_trace_is_numbered_in_order() {
        let tenant = load_tenant();
        let booking = booking("van", "10", "0", "2026-10-14 10:00:00");

        let quote = calculate_transportation_cost(&booking, &tenant).unwrap();
        let rule_ids: Vec<&str> = quote
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();

        assert_eq!(
            rule_ids,
            vec![
                "vehicle_rate_lookup",
                "transportation_components",
                "surcharge_detection",
                "surcharges",
                "minimum_charge"
            ]
        );
        for (i, step) in quote.audit_trace.steps.iter().enumerate() {
            assert_eq!(step.step_number, i as u32 + 1);
        }
    }

    #[test]
    fn test_total_equals_sum_of_parts() {
        let tenant = load_tenant();
        let mut booking = booking("large_truck", "37.5", "1234.5", "2026-10-18 17:30:00");
        booking.additional_stops = 1;
        booking.urgent = true;

        let quote = calculate_transportation_cost(&booking, &tenant).unwrap();
        let b = &quote.breakdown;
        let parts = b["subtotal"]
            + b["peak_hour_surcharge"]
            + b["weekend_surcharge"]
            + b["holiday_surcharge"]
            + b["urgent_surcharge"]
            + b["minimum_charge_adjustment"];
        assert_eq!(parts, quote.total);
    }
}
