//! HTTP API module for the BizHub platform.
//!
//! This module provides the REST endpoints for pricing quotes, clinic
//! records, F&B orders and reservations, credit wallets and session
//! timers. Every endpoint except `/health` is scoped to the tenant named
//! in the `X-Client-Identifier` header.

mod handlers;
mod request;
mod response;
mod state;
mod tenant;

pub use handlers::create_router;
pub use request::{
    CreateBillRequest, CreateCreditAccountRequest, CreateCreditRequest, CreateOrderRequest,
    CreatePatientRequest, CreateReservationRequest, DatedListQuery, DecisionRequest,
    PatientListQuery, SpendCreditRequest, StartTimerRequest, UpdateVipRequest,
};
pub use response::{ApiError, ApiErrorResponse, ApiSuccess, paginated, success};
pub use state::AppState;
pub use tenant::{CLIENT_IDENTIFIER_HEADER, Tenant};
