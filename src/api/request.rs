//! Request types for the BizHub API.
//!
//! This module defines the JSON bodies and query strings accepted by the
//! record endpoints. Pricing endpoints take
//! [`TransportationBooking`](crate::models::TransportationBooking) and
//! [`ParcelDelivery`](crate::models::ParcelDelivery) directly.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PlatformError, PlatformResult};
use crate::models::{BillItem, DateRange, OrderItem, PageRequest, VipTier};

fn required_text(field: &str, value: &str) -> PlatformResult<()> {
    if value.trim().is_empty() {
        return Err(PlatformError::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Body of `POST /patients`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Date of birth.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// VIP tier, regular when omitted.
    #[serde(default)]
    pub vip_tier: VipTier,
    /// Discount percentage replacing the tier rate.
    #[serde(default)]
    pub vip_discount_override: Option<Decimal>,
}

impl CreatePatientRequest {
    /// Checks required names and the email shape.
    pub fn validate(&self) -> PlatformResult<()> {
        required_text("first_name", &self.first_name)?;
        required_text("last_name", &self.last_name)?;
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(PlatformError::validation("email", "must be a valid email address"));
            }
        }
        Ok(())
    }
}

/// Body of `PUT /patients/{id}/vip`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateVipRequest {
    /// The new tier.
    pub vip_tier: VipTier,
    /// The new override; `null` or omitted clears it.
    #[serde(default)]
    pub vip_discount_override: Option<Decimal>,
}

/// Query string of `GET /patients`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientListQuery {
    /// Only patients in this tier.
    #[serde(default)]
    pub vip_tier: Option<VipTier>,
    /// Page number.
    #[serde(default)]
    pub page: Option<u32>,
    /// Page size.
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl PatientListQuery {
    /// The requested page.
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Query string shared by the dated list endpoints
/// (`GET /bills`, `/orders`, `/reservations`, `/credit-requests`).
#[derive(Debug, Clone, Deserialize)]
pub struct DatedListQuery<S> {
    /// Only records in this status.
    pub status: Option<S>,
    /// Earliest record date, inclusive.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Latest record date, inclusive.
    #[serde(default)]
    pub to: Option<NaiveDate>,
    /// Page number.
    #[serde(default)]
    pub page: Option<u32>,
    /// Page size.
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl<S> DatedListQuery<S> {
    /// The requested date range, rejecting `to` before `from`.
    pub fn date_range(&self) -> PlatformResult<DateRange> {
        let range = DateRange {
            from: self.from,
            to: self.to,
        };
        if range.is_inverted() {
            return Err(PlatformError::validation("to", "must not be before 'from'"));
        }
        Ok(range)
    }

    /// The requested page.
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Body of `POST /bills`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBillRequest {
    /// The billed patient.
    pub patient_id: Uuid,
    /// Billed services.
    pub items: Vec<BillItem>,
    /// Issue date, today when omitted.
    #[serde(default)]
    pub issued_on: Option<NaiveDate>,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Table or counter label.
    #[serde(default)]
    pub table_label: Option<String>,
    /// Ordered items.
    pub items: Vec<OrderItem>,
}

/// Body of `POST /reservations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    /// Name the table is held under.
    pub guest_name: String,
    /// Number of guests.
    pub party_size: u32,
    /// Reservation date.
    pub reserved_for: NaiveDate,
    /// Reservation time.
    pub reserved_time: NaiveTime,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateReservationRequest {
    /// Checks the guest name, party size and that the date is not past.
    pub fn validate(&self, today: NaiveDate) -> PlatformResult<()> {
        required_text("guest_name", &self.guest_name)?;
        if self.party_size == 0 {
            return Err(PlatformError::validation("party_size", "must be at least 1"));
        }
        if self.reserved_for < today {
            return Err(PlatformError::validation("reserved_for", "must not be in the past"));
        }
        Ok(())
    }
}

/// Body of `POST /credit-accounts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCreditAccountRequest {
    /// Name of the account holder.
    pub holder_name: String,
}

impl CreateCreditAccountRequest {
    /// Checks the holder name.
    pub fn validate(&self) -> PlatformResult<()> {
        required_text("holder_name", &self.holder_name)
    }
}

/// Body of `POST /credit-accounts/{id}/spend`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendCreditRequest {
    /// Amount to spend.
    pub amount: Decimal,
    /// What the credit was spent on.
    #[serde(default)]
    pub reference: Option<String>,
}

/// Body of `POST /credit-requests`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCreditRequest {
    /// The account to credit.
    pub account_id: Uuid,
    /// The purchased package.
    pub package_name: String,
    /// The package amount.
    pub amount: Decimal,
}

/// Optional body of the approve and reject endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Reason recorded with the decision.
    #[serde(default)]
    pub note: Option<String>,
}

/// Body of `POST /timers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartTimerRequest {
    /// What is being timed.
    pub label: String,
    /// Price per billable hour.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
}
