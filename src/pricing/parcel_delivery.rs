//! Parcel delivery pricing.
//!
//! Parcels are charged on the greater of actual and volumetric weight:
//!
//! ```text
//! volumetric_kg = length × width × height / volumetric_divisor
//! chargeable_kg = max(weight_kg, volumetric_kg)
//! rate_subtotal = (base_rate + distance_km × per_km + chargeable_kg × per_kg) × multiplier
//! subtotal      = rate_subtotal + fragile_fee
//! total         = max(subtotal + surcharges + insurance, minimum_charge)
//! ```

use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::time::Instant;
use uuid::Uuid;

use crate::config::{ParcelDeliveryRates, TenantConfig};
use crate::error::{PlatformError, PlatformResult};
use crate::models::{AuditStep, AuditTrace, ParcelDelivery, PricingQuote, PricingService};

use super::minimum_charge::apply_minimum_charge;
use super::money::{MAX_AMOUNT, checked_product, checked_sum, ensure_at_most, percent_of, round_money};
use super::surcharge_detection::detect_surcharges;
use super::surcharges::apply_surcharges;
use super::transportation::insert_surcharges;

/// Actual, volumetric and chargeable weight of a parcel.
#[derive(Debug, Clone)]
pub struct ChargeableWeight {
    /// Weight as declared.
    pub actual_kg: Decimal,
    /// Weight implied by the parcel's volume (zero without dimensions).
    pub volumetric_kg: Decimal,
    /// The greater of the two.
    pub chargeable_kg: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Determines the weight a parcel is charged on.
pub fn chargeable_weight(
    parcel: &ParcelDelivery,
    rates: &ParcelDeliveryRates,
    step_number: u32,
) -> PlatformResult<ChargeableWeight> {
    if rates.volumetric_divisor <= Decimal::ZERO {
        return Err(PlatformError::ConfigParseError {
            path: "parcel_delivery.volumetric_divisor".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    let actual_kg = round_money(parcel.weight_kg);
    let volumetric_kg = match &parcel.dimensions_cm {
        Some(dims) => round_money(dims.volume()? / rates.volumetric_divisor),
        None => round_money(Decimal::ZERO),
    };
    let chargeable_kg = actual_kg.max(volumetric_kg);

    let reasoning = match &parcel.dimensions_cm {
        Some(dims) => format!(
            "{} × {} × {} cm / {} = {} kg volumetric; charged on {} kg",
            dims.length.normalize(),
            dims.width.normalize(),
            dims.height.normalize(),
            rates.volumetric_divisor.normalize(),
            volumetric_kg,
            chargeable_kg
        ),
        None => format!("No dimensions given; charged on actual weight {} kg", actual_kg),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "chargeable_weight".to_string(),
        rule_name: "Chargeable Weight".to_string(),
        input: serde_json::json!({
            "weight_kg": parcel.weight_kg.normalize().to_string(),
            "dimensions_cm": parcel.dimensions_cm,
            "volumetric_divisor": rates.volumetric_divisor.normalize().to_string()
        }),
        output: serde_json::json!({
            "actual_weight_kg": actual_kg.to_string(),
            "volumetric_weight_kg": volumetric_kg.to_string(),
            "chargeable_weight_kg": chargeable_kg.to_string()
        }),
        reasoning,
    };

    Ok(ChargeableWeight {
        actual_kg,
        volumetric_kg,
        chargeable_kg,
        audit_step,
    })
}

/// Prices a parcel delivery for a tenant.
///
/// The breakdown holds `base_cost`, `distance_cost`, the three weight
/// figures, `weight_cost`, `service_multiplier`, `rate_subtotal`,
/// `fragile_fee`, `subtotal`, every surcharge key, `insurance_fee`,
/// `minimum_charge_adjustment` and `total`.
///
/// Insurance is added after surcharges and is never surcharged itself.
///
/// # Examples
///
/// ```no_run
/// use bizhub::config::ConfigLoader;
/// use bizhub::models::ParcelDelivery;
/// use bizhub::pricing::calculate_parcel_delivery_cost;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("config/default").unwrap();
/// let tenant = loader.tenant("acme-logistics").unwrap();
/// let parcel: ParcelDelivery = serde_json::from_str(r#"{
///     "service_level": "standard",
///     "weight_kg": "2",
///     "distance_km": "10",
///     "pickup_at": "2026-10-14T10:00:00"
/// }"#).unwrap();
///
/// let quote = calculate_parcel_delivery_cost(&parcel, tenant).unwrap();
/// assert_eq!(quote.total, Decimal::from(94));
/// ```
pub fn calculate_parcel_delivery_cost(
    parcel: &ParcelDelivery,
    tenant: &TenantConfig,
) -> PlatformResult<PricingQuote> {
    let started = Instant::now();
    parcel.validate()?;

    let rates = tenant.parcel_delivery_rates()?;
    let mut trace = AuditTrace::default();

    let level = rates
        .service_levels
        .get(&parcel.service_level)
        .ok_or_else(|| PlatformError::RateNotFound {
            field: "service_level".to_string(),
            kind: "service level".to_string(),
            code: parcel.service_level.clone(),
        })?;

    trace.steps.push(AuditStep {
        step_number: trace.next_step(),
        rule_id: "service_level_lookup".to_string(),
        rule_name: "Service Level Lookup".to_string(),
        input: serde_json::json!({
            "client_identifier": tenant.client_identifier,
            "service_level": parcel.service_level
        }),
        output: serde_json::json!({
            "base_rate": level.base_rate.to_string(),
            "per_km": level.per_km.to_string(),
            "per_kg": level.per_kg.to_string(),
            "multiplier": level.multiplier.to_string()
        }),
        reasoning: format!(
            "Using '{}' rates from {}'s parcel table",
            parcel.service_level, tenant.name
        ),
    });

    let weight = chargeable_weight(parcel, rates, trace.next_step())?;
    trace.steps.push(weight.audit_step.clone());

    let base_cost = round_money(level.base_rate);
    let distance_cost = round_money(checked_product("distance_km", parcel.distance_km, level.per_km)?);
    let weight_field = if weight.volumetric_kg > weight.actual_kg {
        "dimensions_cm"
    } else {
        "weight_kg"
    };
    let weight_cost = round_money(checked_product(
        weight_field,
        weight.chargeable_kg,
        level.per_kg,
    )?);
    let components = checked_sum("total", base_cost, distance_cost)
        .and_then(|sum| checked_sum("total", sum, weight_cost))?;
    let rate_subtotal = round_money(checked_product("total", components, level.multiplier)?);
    let fragile_fee = if parcel.fragile {
        round_money(rates.fragile_fee)
    } else {
        round_money(Decimal::ZERO)
    };
    let subtotal = checked_sum("total", rate_subtotal, fragile_fee)?;
    ensure_at_most("total", subtotal, MAX_AMOUNT)?;

    trace.steps.push(AuditStep {
        step_number: trace.next_step(),
        rule_id: "parcel_components".to_string(),
        rule_name: "Parcel Base Cost".to_string(),
        input: serde_json::json!({
            "distance_km": parcel.distance_km.normalize().to_string(),
            "chargeable_weight_kg": weight.chargeable_kg.to_string(),
            "fragile": parcel.fragile
        }),
        output: serde_json::json!({
            "base_cost": base_cost.to_string(),
            "distance_cost": distance_cost.to_string(),
            "weight_cost": weight_cost.to_string(),
            "rate_subtotal": rate_subtotal.to_string(),
            "fragile_fee": fragile_fee.to_string(),
            "subtotal": subtotal.to_string()
        }),
        reasoning: format!(
            "(${} + ${} + ${}) × {} = ${}; fragile fee ${}; subtotal ${}",
            base_cost,
            distance_cost,
            weight_cost,
            level.multiplier.normalize(),
            rate_subtotal,
            fragile_fee,
            subtotal
        ),
    });

    let detection = detect_surcharges(
        parcel.pickup_at,
        parcel.urgent,
        &rates.surcharges,
        tenant.is_holiday(parcel.pickup_at.date()),
        trace.next_step(),
    );
    trace.steps.push(detection.audit_step);

    let surcharges = apply_surcharges(subtotal, &detection.kinds, &rates.surcharges, trace.next_step());
    trace.steps.push(surcharges.audit_step.clone());

    let insurance_fee = match parcel.declared_value {
        Some(value) => percent_of(value, rates.insurance_percent),
        None => round_money(Decimal::ZERO),
    };
    trace.steps.push(AuditStep {
        step_number: trace.next_step(),
        rule_id: "insurance".to_string(),
        rule_name: "Declared Value Insurance".to_string(),
        input: serde_json::json!({
            "declared_value": parcel.declared_value.map(|v| v.to_string()),
            "insurance_percent": rates.insurance_percent.normalize().to_string()
        }),
        output: serde_json::json!({ "insurance_fee": insurance_fee.to_string() }),
        reasoning: match parcel.declared_value {
            Some(value) => format!(
                "${} × {}% = ${}",
                value.normalize(),
                rates.insurance_percent.normalize(),
                insurance_fee
            ),
            None => "No declared value - no insurance".to_string(),
        },
    });

    let floor = apply_minimum_charge(
        subtotal + surcharges.total + insurance_fee,
        rates.minimum_charge,
        trace.next_step(),
    );
    trace.steps.push(floor.audit_step.clone());

    let mut breakdown = BTreeMap::new();
    breakdown.insert("base_cost".to_string(), base_cost);
    breakdown.insert("distance_cost".to_string(), distance_cost);
    breakdown.insert("actual_weight_kg".to_string(), weight.actual_kg);
    breakdown.insert("volumetric_weight_kg".to_string(), weight.volumetric_kg);
    breakdown.insert("chargeable_weight_kg".to_string(), weight.chargeable_kg);
    breakdown.insert("weight_cost".to_string(), weight_cost);
    breakdown.insert("service_multiplier".to_string(), level.multiplier);
    breakdown.insert("rate_subtotal".to_string(), rate_subtotal);
    breakdown.insert("fragile_fee".to_string(), fragile_fee);
    breakdown.insert("subtotal".to_string(), subtotal);
    insert_surcharges(&mut breakdown, &surcharges.amounts);
    breakdown.insert("insurance_fee".to_string(), insurance_fee);
    breakdown.insert("minimum_charge_adjustment".to_string(), floor.adjustment);
    breakdown.insert("total".to_string(), floor.charged);

    trace.duration_us = started.elapsed().as_micros() as u64;

    Ok(PricingQuote {
        quote_id: Uuid::new_v4(),
        quoted_at: Utc::now(),
        client_identifier: tenant.client_identifier.clone(),
        service: PricingService::ParcelDelivery,
        currency: tenant.currency.clone(),
        breakdown,
        applied_surcharges: detection.kinds,
        minimum_charge_applied: floor.applied,
        total: floor.charged,
        audit_trace: trace,
    })
}
