//! Surcharge condition detection.
//!
//! This module decides which percentage surcharges apply to a pickup:
//! peak hour, weekend, holiday and urgent. The checks are independent, so
//! a Saturday holiday pickup during a peak window that was also flagged
//! urgent attracts all four.

use chrono::{Datelike, NaiveDateTime, Weekday};

use crate::config::SurchargeRates;
use crate::models::{AuditStep, SurchargeKind};

/// The result of surcharge detection, including the audit step.
#[derive(Debug, Clone)]
pub struct SurchargeDetection {
    /// Applicable surcharges, in [`SurchargeKind::ALL`] order.
    pub kinds: Vec<SurchargeKind>,
    /// The audit step recording this detection.
    pub audit_step: AuditStep,
}

/// Returns true if the date of `datetime` is a Saturday or Sunday.
///
/// # Example
///
/// ```
/// use bizhub::pricing::is_weekend;
/// use chrono::NaiveDateTime;
///
/// // 2026-10-17 is a Saturday
/// let saturday = NaiveDateTime::parse_from_str("2026-10-17 15:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert!(is_weekend(saturday));
///
/// // 2026-10-14 is a Wednesday
/// let wednesday = NaiveDateTime::parse_from_str("2026-10-14 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert!(!is_weekend(wednesday));
/// ```
pub fn is_weekend(datetime: NaiveDateTime) -> bool {
    matches!(datetime.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Returns true if the time of `datetime` falls inside any peak window.
pub fn is_peak_hour(datetime: NaiveDateTime, rates: &SurchargeRates) -> bool {
    let time = datetime.time();
    rates.peak_hours.iter().any(|w| w.contains(time))
}

/// Determines which surcharges apply to a pickup.
///
/// # Arguments
///
/// * `pickup_at` - Scheduled pickup time in tenant local time
/// * `urgent` - Whether urgent handling was requested
/// * `rates` - The surcharge table holding the peak windows
/// * `is_holiday` - Whether the pickup date is a tenant holiday
/// * `step_number` - The step number for audit trail sequencing
pub fn detect_surcharges(
    pickup_at: NaiveDateTime,
    urgent: bool,
    rates: &SurchargeRates,
    is_holiday: bool,
    step_number: u32,
) -> SurchargeDetection {
    let peak = is_peak_hour(pickup_at, rates);
    let weekend = is_weekend(pickup_at);

    let kinds: Vec<SurchargeKind> = SurchargeKind::ALL
        .into_iter()
        .filter(|kind| match kind {
            SurchargeKind::PeakHour => peak,
            SurchargeKind::Weekend => weekend,
            SurchargeKind::Holiday => is_holiday,
            SurchargeKind::Urgent => urgent,
        })
        .collect();

    let reasoning = if kinds.is_empty() {
        format!(
            "Pickup at {} ({}) is off-peak on an ordinary day - no surcharges",
            pickup_at,
            pickup_at.weekday()
        )
    } else {
        let names: Vec<String> = kinds.iter().map(|k| k.to_string()).collect();
        format!(
            "Pickup at {} ({}) attracts: {}",
            pickup_at,
            pickup_at.weekday(),
            names.join(", ")
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "surcharge_detection".to_string(),
        rule_name: "Surcharge Detection".to_string(),
        input: serde_json::json!({
            "pickup_at": pickup_at.to_string(),
            "weekday": pickup_at.weekday().to_string(),
            "urgent": urgent,
            "is_holiday": is_holiday
        }),
        output: serde_json::json!({
            "peak_hour": peak,
            "weekend": weekend,
            "holiday": is_holiday,
            "urgent": urgent
        }),
        reasoning,
    };

    SurchargeDetection { kinds, audit_step }
}
