//! Percentage surcharge application.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::config::SurchargeRates;
use crate::models::{AuditStep, SurchargeKind};

use super::money::percent_of;

/// The result of applying surcharges, including the audit step.
#[derive(Debug, Clone)]
pub struct SurchargeResult {
    /// Amount per applicable surcharge.
    pub amounts: BTreeMap<SurchargeKind, Decimal>,
    /// Sum of all surcharge amounts.
    pub total: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Returns the configured percentage for one surcharge kind.
pub fn surcharge_percent(kind: SurchargeKind, rates: &SurchargeRates) -> Decimal {
    match kind {
        SurchargeKind::PeakHour => rates.peak_hour_percent,
        SurchargeKind::Weekend => rates.weekend_percent,
        SurchargeKind::Holiday => rates.holiday_percent,
        SurchargeKind::Urgent => rates.urgent_percent,
    }
}

/// Applies each surcharge to the same subtotal.
///
/// Surcharges are additive, not compounding: a 10% weekend and a 20%
/// urgent surcharge on 600.00 add 60.00 and 120.00.
///
/// # Examples
///
/// ```
/// use bizhub::config::SurchargeRates;
/// use bizhub::models::SurchargeKind;
/// use bizhub::pricing::apply_surcharges;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rates = SurchargeRates {
///     peak_hours: vec![],
///     peak_hour_percent: Decimal::from(15),
///     weekend_percent: Decimal::from(10),
///     holiday_percent: Decimal::from(25),
///     urgent_percent: Decimal::from(20),
/// };
///
/// let result = apply_surcharges(
///     Decimal::from(600),
///     &[SurchargeKind::Weekend, SurchargeKind::Urgent],
///     &rates,
///     1,
/// );
/// assert_eq!(result.total, Decimal::from_str("180.00").unwrap());
/// ```
pub fn apply_surcharges(
    subtotal: Decimal,
    kinds: &[SurchargeKind],
    rates: &SurchargeRates,
    step_number: u32,
) -> SurchargeResult {
    let amounts: BTreeMap<SurchargeKind, Decimal> = kinds
        .iter()
        .map(|&kind| (kind, percent_of(subtotal, surcharge_percent(kind, rates))))
        .collect();

    let total: Decimal = amounts.values().copied().sum();

    let lines: Vec<String> = amounts
        .iter()
        .map(|(kind, amount)| {
            format!(
                "{} {}% = ${}",
                kind,
                surcharge_percent(*kind, rates).normalize(),
                amount
            )
        })
        .collect();

    let reasoning = if lines.is_empty() {
        "No surcharges apply".to_string()
    } else {
        format!(
            "Surcharges on subtotal ${}: {} (total ${})",
            subtotal,
            lines.join("; "),
            total
        )
    };

    let output: serde_json::Map<String, serde_json::Value> = amounts
        .iter()
        .map(|(kind, amount)| {
            (
                kind.breakdown_key().to_string(),
                serde_json::Value::String(amount.to_string()),
            )
        })
        .collect();

    let audit_step = AuditStep {
        step_number,
        rule_id: "surcharges".to_string(),
        rule_name: "Percentage Surcharges".to_string(),
        input: serde_json::json!({
            "subtotal": subtotal.to_string(),
            "applicable": kinds
        }),
        output: serde_json::Value::Object(output),
        reasoning,
    };

    SurchargeResult {
        amounts,
        total,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn rates() -> SurchargeRates {
        SurchargeRates {
            peak_hours: vec![],
            peak_hour_percent: dec("15"),
            weekend_percent: dec("10"),
            holiday_percent: dec("25"),
            urgent_percent: dec("20"),
        }
    }

    #[test]
    fn test_no_surcharges() {
        let result = apply_surcharges(dec("500.00"), &[], &rates(), 1);
        assert!(result.amounts.is_empty());
        assert_eq!(result.total, Decimal::ZERO);
        assert_eq!(result.audit_step.reasoning, "No surcharges apply");
    }

    #[test]
    fn test_surcharges_do_not_compound() {
        let result = apply_surcharges(
            dec("600.00"),
            &[
                SurchargeKind::PeakHour,
                SurchargeKind::Weekend,
                SurchargeKind::Urgent,
            ],
            &rates(),
            1,
        );
        assert_eq!(result.amounts[&SurchargeKind::PeakHour], dec("90.00"));
        assert_eq!(result.amounts[&SurchargeKind::Weekend], dec("60.00"));
        assert_eq!(result.amounts[&SurchargeKind::Urgent], dec("120.00"));
        assert_eq!(result.total, dec("270.00"));
    }

    #[test]
    fn test_surcharge_amounts_are_rounded() {
        let result = apply_surcharges(dec("33.33"), &[SurchargeKind::Holiday], &rates(), 1);
        // 33.33 * 25% = 8.3325
        assert_eq!(result.total, dec("8.33"));
    }

    #[test]
    fn test_audit_output_uses_breakdown_keys() {
        let result = apply_surcharges(dec("100.00"), &[SurchargeKind::Holiday], &rates(), 4);
        assert_eq!(result.audit_step.step_number, 4);
        assert_eq!(
            result.audit_step.output["holiday_surcharge"].as_str().unwrap(),
            "25.00"
        );
        assert!(result.audit_step.reasoning.contains("holiday 25%"));
    }
}
