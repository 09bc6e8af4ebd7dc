//! Clinic records: patients and patient bills.
//!
//! This module defines the [`Patient`] record with its VIP classification
//! and the [`PatientBill`] issued against it.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tenant::{has_status, tenant_scoped};
use super::Dated;

/// Patient classification driving discount and priority rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VipTier {
    /// No VIP benefits.
    #[default]
    Regular,
    /// Entry VIP tier.
    Silver,
    /// Priority VIP tier.
    Gold,
    /// Highest VIP tier.
    Platinum,
}

impl VipTier {
    /// Returns true if patients of this tier are served ahead of the queue.
    ///
    /// # Examples
    ///
    /// ```
    /// use bizhub::models::VipTier;
    ///
    /// assert!(VipTier::Gold.is_priority());
    /// assert!(!VipTier::Silver.is_priority());
    /// ```
    pub fn is_priority(self) -> bool {
        matches!(self, VipTier::Gold | VipTier::Platinum)
    }

    /// Sort key placing higher tiers first.
    pub fn priority_rank(self) -> u8 {
        match self {
            VipTier::Platinum => 0,
            VipTier::Gold => 1,
            VipTier::Silver => 2,
            VipTier::Regular => 3,
        }
    }
}

/// A clinic patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    /// Unique identifier for the patient record.
    pub id: Uuid,
    /// The owning tenant.
    pub client_identifier: String,
    /// Generated account reference number.
    pub arn: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Date of birth.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// VIP classification.
    #[serde(default)]
    pub vip_tier: VipTier,
    /// Discount percentage replacing the tier-derived one.
    #[serde(default)]
    pub vip_discount_override: Option<Decimal>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl Patient {
    /// Returns "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One line on a patient bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillItem {
    /// What was provided.
    pub description: String,
    /// Number of units.
    pub quantity: u32,
    /// Price per unit.
    pub unit_price: Decimal,
}

/// Payment status of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    /// Awaiting payment.
    Unpaid,
    /// Settled.
    Paid,
}

/// A bill issued to a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientBill {
    /// Unique identifier for the bill.
    pub id: Uuid,
    /// The owning tenant.
    pub client_identifier: String,
    /// Generated bill number.
    pub bill_number: String,
    /// The billed patient.
    pub patient_id: Uuid,
    /// Billed items.
    pub items: Vec<BillItem>,
    /// Sum of all item lines.
    pub subtotal: Decimal,
    /// VIP discount percentage applied.
    pub discount_percent: Decimal,
    /// Discount amount deducted from the subtotal.
    pub discount_amount: Decimal,
    /// Amount payable.
    pub total: Decimal,
    /// Payment status.
    pub status: BillStatus,
    /// The date the bill was issued.
    pub issued_on: NaiveDate,
    /// When the bill was paid.
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Dated for PatientBill {
    fn record_date(&self) -> NaiveDate {
        self.issued_on
    }
}

tenant_scoped!(Patient, PatientBill);
has_status!(PatientBill => BillStatus);
