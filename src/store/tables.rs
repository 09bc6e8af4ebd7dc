//! The in-memory record tables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::{PlatformError, PlatformResult};
use crate::models::{
    CreditAccount, CreditLedgerEntry, CreditRequest, FnbOrder, Patient, PatientBill,
    Reservation, SessionTimer, TenantScoped,
};
use crate::rules::CodeKind;

/// Every persisted record, keyed by id, plus the sequence counters.
///
/// This is also the JSON snapshot format written by [`super::Store`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tables {
    /// Clinic patients.
    pub patients: BTreeMap<Uuid, Patient>,
    /// Patient bills.
    pub bills: BTreeMap<Uuid, PatientBill>,
    /// F&B orders.
    pub orders: BTreeMap<Uuid, FnbOrder>,
    /// Table reservations.
    pub reservations: BTreeMap<Uuid, Reservation>,
    /// Wallet accounts.
    pub credit_accounts: BTreeMap<Uuid, CreditAccount>,
    /// Credit top-up requests.
    pub credit_requests: BTreeMap<Uuid, CreditRequest>,
    /// Append-only balance movements.
    pub credit_ledger: Vec<CreditLedgerEntry>,
    /// Session timers.
    pub timers: BTreeMap<Uuid, SessionTimer>,
    /// Last allocated value per `"{client}/{kind}/{scope}"`.
    pub sequences: BTreeMap<String, u64>,
}

impl Tables {
    /// Allocates the next value of a sequence, starting at 1.
    ///
    /// Runs inside a store transaction, so concurrent callers are
    /// serialized by the write lock and always see distinct values. A
    /// rolled-back transaction does not consume a value.
    pub fn next_sequence(&mut self, client_identifier: &str, kind: CodeKind, scope: &str) -> u64 {
        let key = format!("{}/{}/{}", client_identifier, kind.sequence_name(), scope);
        let value = self.sequences.entry(key).or_insert(0);
        *value += 1;
        *value
    }
}

/// Looks up a record owned by `client_identifier`.
///
/// Records of other tenants are reported as missing.
pub fn find_owned<'a, T: TenantScoped>(
    table: &'a BTreeMap<Uuid, T>,
    client_identifier: &str,
    resource: &str,
    id: Uuid,
) -> PlatformResult<&'a T> {
    table
        .get(&id)
        .filter(|record| record.belongs_to(client_identifier))
        .ok_or_else(|| PlatformError::not_found(resource, id))
}

/// Mutable variant of [`find_owned`].
pub fn find_owned_mut<'a, T: TenantScoped>(
    table: &'a mut BTreeMap<Uuid, T>,
    client_identifier: &str,
    resource: &str,
    id: Uuid,
) -> PlatformResult<&'a mut T> {
    table
        .get_mut(&id)
        .filter(|record| record.belongs_to(client_identifier))
        .ok_or_else(|| PlatformError::not_found(resource, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_sequences_are_scoped() {
        let mut tables = Tables::default();

        assert_eq!(tables.next_sequence("acme", CodeKind::Order, "20261015"), 1);
        assert_eq!(tables.next_sequence("acme", CodeKind::Order, "20261015"), 2);
        assert_eq!(tables.next_sequence("acme", CodeKind::Order, "20261016"), 1);
        assert_eq!(tables.next_sequence("bistro", CodeKind::Order, "20261015"), 1);
        assert_eq!(tables.next_sequence("acme", CodeKind::Bill, "20261015"), 1);
        assert_eq!(tables.sequences["acme/order/20261015"], 2);
    }

    #[test]
    fn test_find_owned_hides_other_tenants() {
        let mut tables = Tables::default();
        let account = CreditAccount::open("corner-bistro", "Ana", Utc::now());
        let id = account.id;
        tables.credit_accounts.insert(id, account);

        assert!(find_owned(&tables.credit_accounts, "corner-bistro", "Credit account", id).is_ok());
        match find_owned(&tables.credit_accounts, "acme-logistics", "Credit account", id) {
            Err(PlatformError::NotFound { resource, .. }) => assert_eq!(resource, "Credit account"),
            other => panic!("Expected NotFound error, got {:?}", other),
        }
        assert!(find_owned_mut(&mut tables.credit_accounts, "corner-bistro", "Credit account", Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_snapshot_tolerates_missing_tables() {
        let tables: Tables = serde_json::from_str(r#"{"sequences": {"a/arn/2026": 4}}"#).unwrap();
        assert!(tables.patients.is_empty());
        assert_eq!(tables.sequences["a/arn/2026"], 4);
    }
}
