//! Core data models for the platform.
//!
//! Every persisted record carries a `client_identifier` and implements
//! [`TenantScoped`].

mod booking;
mod calendar;
mod credit;
mod order;
mod pagination;
mod patient;
mod quote;
mod tenant;
mod timer;

pub use booking::{Dimensions, ParcelDelivery, TransportationBooking};
pub use calendar::{DateRange, PublicHoliday};
pub use credit::{
    CreditAccount, CreditLedgerEntry, CreditRequest, CreditRequestStatus, LedgerEntryKind,
};
pub use order::{FnbOrder, OrderItem, OrderStatus, Reservation, ReservationStatus};
pub use pagination::{Page, PageMeta, PageRequest};
pub use patient::{BillItem, BillStatus, Patient, PatientBill, VipTier};
pub use quote::{AuditStep, AuditTrace, PricingQuote, PricingService, SurchargeKind};
pub use tenant::{Dated, HasStatus, TenantScoped};
pub use timer::{SessionTimer, TimerStatus};
