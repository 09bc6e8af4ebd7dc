//! Credit and wallet ledger records.
//!
//! A [`CreditAccount`] holds two balances: `available_credit`, which can be
//! spent, and `pending_credit`, which is the sum of submitted but undecided
//! [`CreditRequest`]s. Every movement is recorded as a
//! [`CreditLedgerEntry`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tenant::{has_status, tenant_scoped};
use super::Dated;

/// A customer wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditAccount {
    /// Unique identifier for the account.
    pub id: Uuid,
    /// The owning tenant.
    pub client_identifier: String,
    /// Name of the account holder.
    pub holder_name: String,
    /// Spendable balance. Never negative.
    pub available_credit: Decimal,
    /// Sum of pending request amounts. Never negative.
    pub pending_credit: Decimal,
    /// When the account was opened.
    pub created_at: DateTime<Utc>,
    /// When a balance last changed.
    pub updated_at: DateTime<Utc>,
}

impl CreditAccount {
    /// Opens an empty account.
    pub fn open(client_identifier: &str, holder_name: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_identifier: client_identifier.to_string(),
            holder_name: holder_name.to_string(),
            available_credit: Decimal::ZERO,
            pending_credit: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Decision state of a credit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditRequestStatus {
    /// Awaiting a decision.
    Pending,
    /// Credited to the account.
    Approved,
    /// Declined.
    Rejected,
}

impl std::fmt::Display for CreditRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreditRequestStatus::Pending => write!(f, "pending"),
            CreditRequestStatus::Approved => write!(f, "approved"),
            CreditRequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A request to top up an account with a credit package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditRequest {
    /// Unique identifier for the request.
    pub id: Uuid,
    /// The owning tenant.
    pub client_identifier: String,
    /// The account to credit.
    pub account_id: Uuid,
    /// The purchased package.
    pub package_name: String,
    /// The package amount.
    pub amount: Decimal,
    /// Decision state.
    pub status: CreditRequestStatus,
    /// When the request was submitted.
    pub requested_at: DateTime<Utc>,
    /// When the request was approved or rejected.
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
    /// Reason given with the decision.
    #[serde(default)]
    pub decision_note: Option<String>,
}

impl Dated for CreditRequest {
    fn record_date(&self) -> NaiveDate {
        self.requested_at.date_naive()
    }
}

/// The kind of balance movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryKind {
    /// A request moved an amount into pending credit.
    Requested,
    /// Pending credit became available.
    Approved,
    /// Pending credit was released.
    Rejected,
    /// Available credit was consumed.
    Spent,
}

/// An immutable record of one balance movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditLedgerEntry {
    /// Unique identifier for the entry.
    pub id: Uuid,
    /// The owning tenant.
    pub client_identifier: String,
    /// The affected account.
    pub account_id: Uuid,
    /// The movement kind.
    pub kind: LedgerEntryKind,
    /// The amount moved.
    pub amount: Decimal,
    /// Available balance after the movement.
    pub available_after: Decimal,
    /// Pending balance after the movement.
    pub pending_after: Decimal,
    /// Related request id or spend reference.
    #[serde(default)]
    pub reference: Option<String>,
    /// When the movement happened.
    pub recorded_at: DateTime<Utc>,
}

impl CreditLedgerEntry {
    /// Records the balances of `account` after a movement.
    pub fn record(
        account: &CreditAccount,
        kind: LedgerEntryKind,
        amount: Decimal,
        reference: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_identifier: account.client_identifier.clone(),
            account_id: account.id,
            kind,
            amount,
            available_after: account.available_credit,
            pending_after: account.pending_credit,
            reference,
            recorded_at: now,
        }
    }
}

tenant_scoped!(CreditAccount, CreditRequest, CreditLedgerEntry);
has_status!(CreditRequest => CreditRequestStatus);
