//! Query scopes over record iterators.

use crate::models::{DateRange, Dated, HasStatus, TenantScoped};

/// Filters for iterators of borrowed records, chained like query scopes:
///
/// ```
/// use bizhub::models::{CreditRequestStatus, DateRange};
/// use bizhub::store::{RecordScopes, Tables};
///
/// let tables = Tables::default();
/// let pending: Vec<_> = tables
///     .credit_requests
///     .values()
///     .for_client("corner-bistro")
///     .with_status(Some(CreditRequestStatus::Pending))
///     .between_dates(DateRange::default())
///     .collect();
/// assert!(pending.is_empty());
/// ```
pub trait RecordScopes<'a, T: 'a>: Iterator<Item = &'a T> + Sized {
    /// Keeps records owned by `client_identifier`.
    fn for_client(self, client_identifier: &'a str) -> impl Iterator<Item = &'a T>
    where
        T: TenantScoped,
    {
        self.filter(move |record| record.belongs_to(client_identifier))
    }

    /// Keeps records in `status`; `None` keeps everything.
    fn with_status(self, status: Option<T::Status>) -> impl Iterator<Item = &'a T>
    where
        T: HasStatus,
    {
        self.filter(move |record| status.is_none_or(|s| record.status() == s))
    }

    /// Keeps records whose date falls in `range` (inclusive).
    fn between_dates(self, range: DateRange) -> impl Iterator<Item = &'a T>
    where
        T: Dated,
    {
        self.filter(move |record| range.contains_date(record.record_date()))
    }
}

impl<'a, T: 'a, I: Iterator<Item = &'a T>> RecordScopes<'a, T> for I {}
