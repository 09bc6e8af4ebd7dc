//! Pricing result models.
//!
//! This module contains the [`PricingQuote`] returned by the rate
//! calculators and the [`AuditTrace`] recording each step of the
//! calculation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// The service a quote was produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingService {
    /// Truck and van dispatch.
    Transportation,
    /// Parcel delivery.
    ParcelDelivery,
}

/// A condition that adds a percentage surcharge.
///
/// # Example
///
/// ```
/// use bizhub::models::SurchargeKind;
///
/// assert_eq!(SurchargeKind::PeakHour.breakdown_key(), "peak_hour_surcharge");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurchargeKind {
    /// Pickup falls inside a peak-hour window.
    PeakHour,
    /// Pickup falls on a Saturday or Sunday.
    Weekend,
    /// Pickup falls on a tenant holiday.
    Holiday,
    /// Urgent handling was requested.
    Urgent,
}

impl SurchargeKind {
    /// All surcharge kinds in breakdown order.
    pub const ALL: [SurchargeKind; 4] = [
        SurchargeKind::PeakHour,
        SurchargeKind::Weekend,
        SurchargeKind::Holiday,
        SurchargeKind::Urgent,
    ];

    /// The key this surcharge uses in a cost breakdown.
    pub fn breakdown_key(self) -> &'static str {
        match self {
            SurchargeKind::PeakHour => "peak_hour_surcharge",
            SurchargeKind::Weekend => "weekend_surcharge",
            SurchargeKind::Holiday => "holiday_surcharge",
            SurchargeKind::Urgent => "urgent_surcharge",
        }
    }
}

impl std::fmt::Display for SurchargeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurchargeKind::PeakHour => write!(f, "peak hour"),
            SurchargeKind::Weekend => write!(f, "weekend"),
            SurchargeKind::Holiday => write!(f, "holiday"),
            SurchargeKind::Urgent => write!(f, "urgent"),
        }
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

impl AuditTrace {
    /// The step number the next pushed step will carry.
    pub fn next_step(&self) -> u32 {
        self.steps.len() as u32 + 1
    }
}

/// A priced booking or delivery.
///
/// `breakdown` maps component names (e.g. `"base_cost"`,
/// `"weekend_surcharge"`) to amounts; `total` equals `breakdown["total"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingQuote {
    /// Unique identifier for this quote.
    pub quote_id: Uuid,
    /// When the quote was produced.
    pub quoted_at: DateTime<Utc>,
    /// The tenant whose rate table was used.
    pub client_identifier: String,
    /// The priced service.
    pub service: PricingService,
    /// ISO currency code of every amount.
    pub currency: String,
    /// Component amounts.
    pub breakdown: BTreeMap<String, Decimal>,
    /// The surcharges that applied.
    pub applied_surcharges: Vec<SurchargeKind>,
    /// Whether the minimum-charge floor raised the total.
    pub minimum_charge_applied: bool,
    /// The amount charged.
    pub total: Decimal,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surcharge_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&SurchargeKind::PeakHour).unwrap(),
            "\"peak_hour\""
        );
        assert_eq!(serde_json::to_string(&SurchargeKind::Urgent).unwrap(), "\"urgent\"");
    }

    #[test]
    fn test_breakdown_keys_are_distinct() {
        let keys: std::collections::HashSet<_> =
            SurchargeKind::ALL.iter().map(|k| k.breakdown_key()).collect();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_next_step_numbering() {
        let mut trace = AuditTrace::default();
        assert_eq!(trace.next_step(), 1);
        trace.steps.push(AuditStep {
            step_number: 1,
            rule_id: "x".to_string(),
            rule_name: "X".to_string(),
            input: serde_json::json!({}),
            output: serde_json::json!({}),
            reasoning: String::new(),
        });
        assert_eq!(trace.next_step(), 2);
    }

    #[test]
    fn test_service_serialization() {
        assert_eq!(
            serde_json::to_string(&PricingService::ParcelDelivery).unwrap(),
            "\"parcel_delivery\""
        );
    }
}
