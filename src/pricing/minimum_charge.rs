//! Minimum-charge floor.

use rust_decimal::Decimal;

use crate::models::AuditStep;

use super::money::round_money;

/// The result of applying the minimum-charge floor.
#[derive(Debug, Clone)]
pub struct MinimumChargeResult {
    /// The amount charged after the floor.
    pub charged: Decimal,
    /// How much the floor added (zero when not applied).
    pub adjustment: Decimal,
    /// Whether the floor raised the amount.
    pub applied: bool,
    /// The audit step recording this decision.
    pub audit_step: AuditStep,
}

/// Raises `amount` to `minimum` when it falls below it.
///
/// # Examples
///
/// ```
/// use bizhub::pricing::apply_minimum_charge;
/// use rust_decimal::Decimal;
///
/// let result = apply_minimum_charge(Decimal::from(120), Decimal::from(500), 1);
/// assert!(result.applied);
/// assert_eq!(result.charged, Decimal::from(500));
/// assert_eq!(result.adjustment, Decimal::from(380));
/// ```
pub fn apply_minimum_charge(amount: Decimal, minimum: Decimal, step_number: u32) -> MinimumChargeResult {
    let amount = round_money(amount);
    let minimum = round_money(minimum);

    let (charged, adjustment, applied) = if amount < minimum {
        (minimum, minimum - amount, true)
    } else {
        (amount, round_money(Decimal::ZERO), false)
    };

    let reasoning = if applied {
        format!(
            "Calculated ${} is below the minimum charge ${} - raised by ${}",
            amount, minimum, adjustment
        )
    } else {
        format!(
            "Calculated ${} meets the minimum charge ${}",
            amount, minimum
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "minimum_charge".to_string(),
        rule_name: "Minimum Charge".to_string(),
        input: serde_json::json!({
            "amount": amount.to_string(),
            "minimum_charge": minimum.to_string()
        }),
        output: serde_json::json!({
            "charged": charged.to_string(),
            "adjustment": adjustment.to_string(),
            "applied": applied
        }),
        reasoning,
    };

    MinimumChargeResult {
        charged,
        adjustment,
        applied,
        audit_step,
    }
}
