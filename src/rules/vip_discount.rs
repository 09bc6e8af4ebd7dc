//! VIP discounts for patient bills.

use rust_decimal::Decimal;

use crate::config::VipTierRates;
use crate::error::{PlatformError, PlatformResult};
use crate::models::VipTier;
use crate::pricing::{percent_of, round_money};

/// Returns the discount percentage for a patient.
///
/// A per-patient override wins over the tier rate. Regular patients get
/// no tier discount.
///
/// # Example
///
/// ```
/// use bizhub::config::VipTierRates;
/// use bizhub::models::VipTier;
/// use bizhub::rules::vip_discount_percent;
/// use rust_decimal::Decimal;
///
/// let rates = VipTierRates {
///     silver: Decimal::from(5),
///     gold: Decimal::from(10),
///     platinum: Decimal::from(15),
/// };
/// assert_eq!(vip_discount_percent(VipTier::Gold, None, &rates).unwrap(), Decimal::from(10));
/// assert_eq!(
///     vip_discount_percent(VipTier::Gold, Some(Decimal::from(30)), &rates).unwrap(),
///     Decimal::from(30)
/// );
/// ```
pub fn vip_discount_percent(
    tier: VipTier,
    override_percent: Option<Decimal>,
    rates: &VipTierRates,
) -> PlatformResult<Decimal> {
    if let Some(percent) = override_percent {
        validate_discount_percent("vip_discount_override", percent)?;
        return Ok(percent);
    }

    Ok(match tier {
        VipTier::Regular => Decimal::ZERO,
        VipTier::Silver => rates.silver,
        VipTier::Gold => rates.gold,
        VipTier::Platinum => rates.platinum,
    })
}

/// Checks that a discount percentage lies within 0..=100.
pub fn validate_discount_percent(field: &str, percent: Decimal) -> PlatformResult<()> {
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(PlatformError::validation(
            field,
            "must be between 0 and 100",
        ));
    }
    Ok(())
}

/// Applies a discount percentage, returning `(discount_amount, total)`.
pub fn apply_vip_discount(subtotal: Decimal, percent: Decimal) -> (Decimal, Decimal) {
    let subtotal = round_money(subtotal);
    let discount = percent_of(subtotal, percent);
    (discount, subtotal - discount)
}
