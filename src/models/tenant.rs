//! Tenant scoping traits shared by every record type.

use chrono::NaiveDate;

/// A record owned by one tenant.
pub trait TenantScoped {
    /// The tenant-scoping key of the record.
    fn client_identifier(&self) -> &str;

    /// Returns true if the record belongs to `client_identifier`.
    fn belongs_to(&self, client_identifier: &str) -> bool {
        self.client_identifier() == client_identifier
    }
}

/// A record with a status column.
pub trait HasStatus {
    /// The status enumeration.
    type Status: PartialEq + Copy;

    /// The current status of the record.
    fn status(&self) -> Self::Status;
}

/// A record that is filtered by a calendar date in list endpoints.
pub trait Dated {
    /// The date the record is filed under.
    fn record_date(&self) -> NaiveDate;
}

/// Implements [`TenantScoped`] for structs with a `client_identifier` field.
macro_rules! tenant_scoped {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::models::TenantScoped for $ty {
                fn client_identifier(&self) -> &str {
                    &self.client_identifier
                }
            }
        )+
    };
}

/// Implements [`HasStatus`] for structs with a `status` field.
macro_rules! has_status {
    ($($ty:ty => $status:ty),+ $(,)?) => {
        $(
            impl $crate::models::HasStatus for $ty {
                type Status = $status;

                fn status(&self) -> $status {
                    self.status
                }
            }
        )+
    };
}

pub(crate) use has_status;
pub(crate) use tenant_scoped;
