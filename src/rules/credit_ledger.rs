//! Credit request and wallet balance transitions.
//!
//! Every function here mutates an account (and request) in place and
//! returns the [`CreditLedgerEntry`] describing the movement. Nothing is
//! persisted: callers run these inside a store transaction so a failed
//! step leaves both balances untouched.
//!
//! ```text
//! submit   pending += amount
//! approve  pending -= amount, available += amount
//! reject   pending -= amount
//! spend    available -= amount
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{PlatformError, PlatformResult};
use crate::models::{
    CreditAccount, CreditLedgerEntry, CreditRequest, CreditRequestStatus, LedgerEntryKind,
};
use crate::pricing::{MAX_AMOUNT, checked_sum, ensure_at_most, round_money};

fn positive_amount(amount: Decimal) -> PlatformResult<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(PlatformError::validation("amount", "must be greater than zero"));
    }
    ensure_at_most("amount", amount, MAX_AMOUNT)?;
    Ok(round_money(amount))
}

fn ensure_pending(request: &CreditRequest) -> PlatformResult<()> {
    match request.status {
        CreditRequestStatus::Pending => Ok(()),
        decided => Err(PlatformError::business_rule(format!(
            "Credit request has already been {}",
            decided
        ))),
    }
}

fn ensure_same_account(account: &CreditAccount, request: &CreditRequest) -> PlatformResult<()> {
    if request.account_id != account.id || request.client_identifier != account.client_identifier {
        return Err(PlatformError::business_rule(
            "Credit request does not belong to this account",
        ));
    }
    Ok(())
}

fn release_pending(account: &mut CreditAccount, amount: Decimal) -> PlatformResult<()> {
    if account.pending_credit < amount {
        return Err(PlatformError::business_rule(
            "Pending credit is lower than the request amount",
        ));
    }
    account.pending_credit -= amount;
    Ok(())
}

/// Submits a request for a credit package, reserving its amount as pending.
pub fn submit_request(
    account: &mut CreditAccount,
    package_name: &str,
    amount: Decimal,
    now: DateTime<Utc>,
) -> PlatformResult<(CreditRequest, CreditLedgerEntry)> {
    if package_name.trim().is_empty() {
        return Err(PlatformError::validation("package_name", "must not be empty"));
    }
    let amount = positive_amount(amount)?;
    let pending = checked_sum("amount", account.pending_credit, amount)?;

    let request = CreditRequest {
        id: Uuid::new_v4(),
        client_identifier: account.client_identifier.clone(),
        account_id: account.id,
        package_name: package_name.to_string(),
        amount,
        status: CreditRequestStatus::Pending,
        requested_at: now,
        decided_at: None,
        decision_note: None,
    };

    account.pending_credit = pending;
    account.updated_at = now;

    let entry = CreditLedgerEntry::record(
        account,
        LedgerEntryKind::Requested,
        amount,
        Some(request.id.to_string()),
        now,
    );
    Ok((request, entry))
}

/// Approves a pending request, moving its amount from pending to available.
///
/// # Example
///
/// ```
/// use bizhub::models::{CreditAccount, CreditRequestStatus};
/// use bizhub::rules::{approve_request, submit_request};
/// use chrono::Utc;
/// use rust_decimal::Decimal;
///
/// let now = Utc::now();
/// let mut account = CreditAccount::open("corner-bistro", "Ana", now);
/// let (mut request, _) = submit_request(&mut account, "Gold Pack", Decimal::from(500), now).unwrap();
///
/// approve_request(&mut account, &mut request, now, None).unwrap();
/// assert_eq!(request.status, CreditRequestStatus::Approved);
/// assert_eq!(account.available_credit, Decimal::from(500));
/// assert_eq!(account.pending_credit, Decimal::ZERO);
///
/// // A second approval is refused and changes nothing.
/// assert!(approve_request(&mut account, &mut request, now, None).is_err());
/// assert_eq!(account.available_credit, Decimal::from(500));
/// ```
pub fn approve_request(
    account: &mut CreditAccount,
    request: &mut CreditRequest,
    now: DateTime<Utc>,
    note: Option<String>,
) -> PlatformResult<CreditLedgerEntry> {
    ensure_same_account(account, request)?;
    ensure_pending(request)?;
    let available = checked_sum("amount", account.available_credit, request.amount)?;
    release_pending(account, request.amount)?;

    account.available_credit = available;
    account.updated_at = now;
    request.status = CreditRequestStatus::Approved;
    request.decided_at = Some(now);
    request.decision_note = note;

    Ok(CreditLedgerEntry::record(
        account,
        LedgerEntryKind::Approved,
        request.amount,
        Some(request.id.to_string()),
        now,
    ))
}

/// Rejects a pending request, releasing its pending amount.
pub fn reject_request(
    account: &mut CreditAccount,
    request: &mut CreditRequest,
    now: DateTime<Utc>,
    note: Option<String>,
) -> PlatformResult<CreditLedgerEntry> {
    ensure_same_account(account, request)?;
    ensure_pending(request)?;
    release_pending(account, request.amount)?;

    account.updated_at = now;
    request.status = CreditRequestStatus::Rejected;
    request.decided_at = Some(now);
    request.decision_note = note;

    Ok(CreditLedgerEntry::record(
        account,
        LedgerEntryKind::Rejected,
        request.amount,
        Some(request.id.to_string()),
        now,
    ))
}

/// Spends available credit.
pub fn spend_credit(
    account: &mut CreditAccount,
    amount: Decimal,
    reference: Option<String>,
    now: DateTime<Utc>,
) -> PlatformResult<CreditLedgerEntry> {
    let amount = positive_amount(amount)?;
    if account.available_credit < amount {
        return Err(PlatformError::business_rule(format!(
            "Insufficient credit: available {}, requested {}",
            account.available_credit, amount
        )));
    }

    account.available_credit -= amount;
    account.updated_at = now;

    Ok(CreditLedgerEntry::record(
        account,
        LedgerEntryKind::Spent,
        amount,
        reference,
        now,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn account() -> CreditAccount {
        CreditAccount::open("corner-bistro", "Ana Reyes", Utc::now())
    }

    #[test]
    fn test_submit_moves_amount_to_pending() {
        let mut account = account();
        let (request, entry) = submit_request(&mut account, "Starter", dec("250"), Utc::now()).unwrap();

        assert_eq!(request.status, CreditRequestStatus::Pending);
        assert_eq!(request.amount, dec("250.00"));
        assert_eq!(account.pending_credit, dec("250.00"));
        assert_eq!(account.available_credit, Decimal::ZERO);
        assert_eq!(entry.kind, LedgerEntryKind::Requested);
        assert_eq!(entry.pending_after, dec("250.00"));
    }

    #[test]
    fn test_submit_rejects_non_positive_amount() {
        let mut account = account();
        assert!(matches!(
            submit_request(&mut account, "Starter", Decimal::ZERO, Utc::now()),
            Err(PlatformError::Validation { .. })
        ));
        assert_eq!(account.pending_credit, Decimal::ZERO);
    }

    #[test]
    fn test_reject_releases_pending_only() {
        let mut account = account();
        let now = Utc::now();
        let (mut request, _) = submit_request(&mut account, "Starter", dec("100"), now).unwrap();

        let entry = reject_request(&mut account, &mut request, now, Some("Unpaid".to_string())).unwrap();

        assert_eq!(request.status, CreditRequestStatus::Rejected);
        assert_eq!(request.decision_note.as_deref(), Some("Unpaid"));
        assert_eq!(account.pending_credit, Decimal::ZERO);
        assert_eq!(account.available_credit, Decimal::ZERO);
        assert_eq!(entry.kind, LedgerEntryKind::Rejected);
    }

    #[test]
    fn test_decided_request_cannot_be_decided_again() {
        let mut account = account();
        let now = Utc::now();
        let (mut request, _) = submit_request(&mut account, "Starter", dec("100"), now).unwrap();
        reject_request(&mut account, &mut request, now, None).unwrap();

        match approve_request(&mut account, &mut request, now, None) {
            Err(PlatformError::BusinessRule { message }) => {
                assert_eq!(message, "Credit request has already been rejected");
            }
            other => panic!("Expected BusinessRule error, got {:?}", other),
        }
        assert_eq!(account.available_credit, Decimal::ZERO);
    }

    #[test]
    fn test_request_for_other_account_is_refused() {
        let now = Utc::now();
        let mut owner = account();
        let mut stranger = account();
        let (mut request, _) = submit_request(&mut owner, "Starter", dec("100"), now).unwrap();

        assert!(matches!(
            approve_request(&mut stranger, &mut request, now, None),
            Err(PlatformError::BusinessRule { .. })
        ));
        assert_eq!(request.status, CreditRequestStatus::Pending);
    }

    #[test]
    fn test_huge_amount_is_a_field_error() {
        let now = Utc::now();
        let mut account = account();
        for _ in 0..2 {
            match submit_request(&mut account, "Whale", dec("50000000000000000000000000000"), now) {
                Err(PlatformError::Validation { field, .. }) => assert_eq!(field, "amount"),
                other => panic!("Expected Validation error, got {:?}", other),
            }
        }
        assert_eq!(account.pending_credit, Decimal::ZERO);
    }

    #[test]
    fn test_balance_overflow_changes_nothing() {
        let now = Utc::now();
        let mut account = account();
        let (mut request, _) = submit_request(&mut account, "Starter", dec("100"), now).unwrap();

        account.available_credit = Decimal::MAX;
        match approve_request(&mut account, &mut request, now, None) {
            Err(PlatformError::Validation { message, .. }) => assert_eq!(message, "is too large"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
        assert_eq!(account.pending_credit, dec("100.00"));
        assert_eq!(request.status, CreditRequestStatus::Pending);

        account.pending_credit = Decimal::MAX;
        assert!(submit_request(&mut account, "Starter", dec("1"), now).is_err());
        assert_eq!(account.pending_credit, Decimal::MAX);
    }

    #[test]
    fn test_spend_requires_available_credit() {
        let now = Utc::now();
        let mut account = account();
        let (mut request, _) = submit_request(&mut account, "Starter", dec("100"), now).unwrap();
        approve_request(&mut account, &mut request, now, None).unwrap();

        let entry = spend_credit(&mut account, dec("60"), Some("ORD-1".to_string()), now).unwrap();
        assert_eq!(entry.available_after, dec("40.00"));

        match spend_credit(&mut account, dec("40.01"), None, now) {
            Err(PlatformError::BusinessRule { message }) => {
                assert!(message.starts_with("Insufficient credit"));
            }
            other => panic!("Expected BusinessRule error, got {:?}", other),
        }
        assert_eq!(account.available_credit, dec("40.00"));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Submit(i64),
        Approve(usize),
        Reject(usize),
        Spend(i64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1i64..100_000).prop_map(Op::Submit),
            (0usize..8).prop_map(Op::Approve),
            (0usize..8).prop_map(Op::Reject),
            (1i64..100_000).prop_map(Op::Spend),
        ]
    }

    proptest! {
        #[test]
        fn balances_never_go_negative(ops in prop::collection::vec(op(), 1..40)) {
            let now = Utc::now();
            let mut account = account();
            let mut requests: Vec<CreditRequest> = Vec::new();

            for op in ops {
                let _ = match op {
                    Op::Submit(cents) => submit_request(&mut account, "Pack", Decimal::new(cents, 2), now)
                        .map(|(request, _)| requests.push(request)),
                    Op::Approve(i) if i < requests.len() => {
                        approve_request(&mut account, &mut requests[i], now, None).map(|_| ())
                    }
                    Op::Reject(i) if i < requests.len() => {
                        reject_request(&mut account, &mut requests[i], now, None).map(|_| ())
                    }
                    Op::Spend(cents) => spend_credit(&mut account, Decimal::new(cents, 2), None, now).map(|_| ()),
                    _ => Ok(()),
                };

                prop_assert!(account.available_credit >= Decimal::ZERO);
                prop_assert!(account.pending_credit >= Decimal::ZERO);
                let pending: Decimal = requests
                    .iter()
                    .filter(|r| r.status == CreditRequestStatus::Pending)
                    .map(|r| r.amount)
                    .sum();
                prop_assert_eq!(pending, account.pending_credit);
            }
        }
    }
}
