//! HTTP request handlers for the BizHub API.
//!
//! Each handler logs a per-request `correlation_id`, resolves the tenant
//! from the `X-Client-Identifier` header, and answers with the JSON
//! envelopes from [`super::response`].

mod bills;
mod credits;
mod orders;
mod patients;
mod pricing;
mod timers;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use super::response::{ApiErrorResponse, success};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/transportation/quote", post(pricing::transportation_quote))
        .route("/parcel-delivery/quote", post(pricing::parcel_delivery_quote))
        .route(
            "/patients",
            post(patients::create_patient).get(patients::list_patients),
        )
        .route("/patients/:id", get(patients::get_patient))
        .route("/patients/:id/vip", put(patients::update_vip))
        .route("/bills", post(bills::create_bill).get(bills::list_bills))
        .route("/bills/:id/pay", post(bills::pay_bill))
        .route("/orders", post(orders::create_order).get(orders::list_orders))
        .route(
            "/reservations",
            post(orders::create_reservation).get(orders::list_reservations),
        )
        .route("/reservations/:id/cancel", post(orders::cancel_reservation))
        .route("/credit-accounts", post(credits::create_account))
        .route("/credit-accounts/:id", get(credits::get_account))
        .route("/credit-accounts/:id/ledger", get(credits::account_ledger))
        .route("/credit-accounts/:id/spend", post(credits::spend))
        .route(
            "/credit-requests",
            post(credits::create_request).get(credits::list_requests),
        )
        .route("/credit-requests/:id/approve", post(credits::approve_request))
        .route("/credit-requests/:id/reject", post(credits::reject_request))
        .route("/timers", post(timers::start))
        .route("/timers/:id", get(timers::show))
        .route("/timers/:id/pause", post(timers::pause))
        .route("/timers/:id/resume", post(timers::resume))
        .route("/timers/:id/stop", post(timers::stop))
        .with_state(state)
}

#[derive(Serialize)]
struct HealthStatus<'a> {
    status: &'static str,
    platform: &'a str,
    version: &'a str,
    tenants: usize,
}

/// Handler for GET /health.
async fn health_handler(State(state): State<AppState>) -> Response {
    let platform = state.config().platform();
    success(
        StatusCode::OK,
        HealthStatus {
            status: "ok",
            platform: &platform.name,
            version: &platform.version,
            tenants: state.config().config().tenants().len(),
        },
    )
}

/// Today's date, used for record numbers and past-date checks.
pub(super) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Converts a handler result into a response, logging failures.
pub(super) fn finish(correlation_id: Uuid, result: Result<Response, ApiErrorResponse>) -> Response {
    match result {
        Ok(response) => response,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                status = err.status.as_u16(),
                code = %err.error.code,
                message = %err.error.message,
                "Request failed"
            );
            err.into_response()
        }
    }
}
