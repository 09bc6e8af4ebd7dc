//! Quote endpoints for the logistics calculators.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::Response,
};
use tracing::info;
use uuid::Uuid;

use crate::api::response::{ApiErrorResponse, success};
use crate::api::tenant::Tenant;
use crate::models::{ParcelDelivery, TransportationBooking};
use crate::pricing::{calculate_parcel_delivery_cost, calculate_transportation_cost};

use super::finish;

/// Handler for POST /transportation/quote.
pub(super) async fn transportation_quote(
    tenant: Tenant,
    payload: Result<Json<TransportationBooking>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        client = tenant.client_identifier(),
        "Processing transportation quote"
    );

    let result = (|| -> Result<Response, ApiErrorResponse> {
        let Json(booking) = payload?;
        let quote = calculate_transportation_cost(&booking, tenant.config())?;
        info!(
            correlation_id = %correlation_id,
            vehicle_type = %booking.vehicle_type,
            total = %quote.total,
            duration_us = quote.audit_trace.duration_us,
            "Transportation quote calculated"
        );
        Ok(success(StatusCode::OK, quote))
    })();

    finish(correlation_id, result)
}

/// Handler for POST /parcel-delivery/quote.
pub(super) async fn parcel_delivery_quote(
    tenant: Tenant,
    payload: Result<Json<ParcelDelivery>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        client = tenant.client_identifier(),
        "Processing parcel delivery quote"
    );

    let result = (|| -> Result<Response, ApiErrorResponse> {
        let Json(parcel) = payload?;
        let quote = calculate_parcel_delivery_cost(&parcel, tenant.config())?;
        info!(
            correlation_id = %correlation_id,
            service_level = %parcel.service_level,
            total = %quote.total,
            duration_us = quote.audit_trace.duration_us,
            "Parcel delivery quote calculated"
        );
        Ok(success(StatusCode::OK, quote))
    })();

    finish(correlation_id, result)
}
