//! F&B order and table reservation endpoints.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::Response,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::api::request::{CreateOrderRequest, CreateReservationRequest, DatedListQuery};
use crate::api::response::{ApiErrorResponse, paginated, success};
use crate::api::state::AppState;
use crate::api::tenant::Tenant;
use crate::error::PlatformError;
use crate::models::{FnbOrder, OrderStatus, Page, Reservation, ReservationStatus};
use crate::rules::{CodeKind, items_total};
use crate::store::{RecordScopes, find_owned_mut};

use super::{finish, today};

/// Handler for POST /orders.
pub(super) async fn create_order(
    State(state): State<AppState>,
    tenant: Tenant,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, client = tenant.client_identifier(), "Creating order");

    let result = async move {
        let Json(request) = payload?;
        let total = items_total(&request.items)?;

        let client = tenant.client_identifier();
        let codes = &tenant.config().codes;
        let now = Utc::now();
        let date = now.date_naive();

        let order = state
            .store()
            .transaction(|tables| {
                let seq = tables.next_sequence(client, CodeKind::Order, &CodeKind::Order.scope(date));
                let order = FnbOrder {
                    id: Uuid::new_v4(),
                    client_identifier: client.to_string(),
                    order_number: CodeKind::Order.format(codes, date, seq),
                    table_label: request.table_label,
                    items: request.items,
                    total,
                    status: OrderStatus::Open,
                    created_at: now,
                };
                tables.orders.insert(order.id, order.clone());
                Ok(order)
            })
            .await?;

        info!(
            correlation_id = %correlation_id,
            order_number = %order.order_number,
            total = %order.total,
            "Order created"
        );
        Ok::<_, ApiErrorResponse>(success(StatusCode::CREATED, order))
    }
    .await;

    finish(correlation_id, result)
}

/// Handler for GET /orders.
pub(super) async fn list_orders(
    State(state): State<AppState>,
    tenant: Tenant,
    query: Result<Query<DatedListQuery<OrderStatus>>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, client = tenant.client_identifier(), "Listing orders");

    let result = async move {
        let Query(query) = query?;
        let range = query.date_range()?;

        let mut orders: Vec<FnbOrder> = state
            .store()
            .read(|tables| {
                tables
                    .orders
                    .values()
                    .for_client(tenant.client_identifier())
                    .with_status(query.status)
                    .between_dates(range)
                    .cloned()
                    .collect()
            })
            .await;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok::<_, ApiErrorResponse>(paginated(Page::paginate(
            orders,
            query.page_request(),
            state.pagination(),
        )))
    }
    .await;

    finish(correlation_id, result)
}

/// Handler for POST /reservations.
pub(super) async fn create_reservation(
    State(state): State<AppState>,
    tenant: Tenant,
    payload: Result<Json<CreateReservationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, client = tenant.client_identifier(), "Creating reservation");

    let result = async move {
        let Json(request) = payload?;
        request.validate(today())?;

        let reservation = Reservation {
            id: Uuid::new_v4(),
            client_identifier: tenant.client_identifier().to_string(),
            guest_name: request.guest_name.trim().to_string(),
            party_size: request.party_size,
            reserved_for: request.reserved_for,
            reserved_time: request.reserved_time,
            status: ReservationStatus::Confirmed,
            notes: request.notes,
        };
        let reservation = state
            .store()
            .transaction(|tables| {
                tables.reservations.insert(reservation.id, reservation.clone());
                Ok(reservation)
            })
            .await?;

        info!(
            correlation_id = %correlation_id,
            reservation_id = %reservation.id,
            reserved_for = %reservation.reserved_for,
            "Reservation created"
        );
        Ok::<_, ApiErrorResponse>(success(StatusCode::CREATED, reservation))
    }
    .await;

    finish(correlation_id, result)
}

/// Handler for GET /reservations.
pub(super) async fn list_reservations(
    State(state): State<AppState>,
    tenant: Tenant,
    query: Result<Query<DatedListQuery<ReservationStatus>>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, client = tenant.client_identifier(), "Listing reservations");

    let result = async move {
        let Query(query) = query?;
        let range = query.date_range()?;

        let mut reservations: Vec<Reservation> = state
            .store()
            .read(|tables| {
                tables
                    .reservations
                    .values()
                    .for_client(tenant.client_identifier())
                    .with_status(query.status)
                    .between_dates(range)
                    .cloned()
                    .collect()
            })
            .await;
        reservations.sort_by_key(|r| (r.reserved_for, r.reserved_time));

        Ok::<_, ApiErrorResponse>(paginated(Page::paginate(
            reservations,
            query.page_request(),
            state.pagination(),
        )))
    }
    .await;

    finish(correlation_id, result)
}

/// Handler for POST /reservations/:id/cancel.
pub(super) async fn cancel_reservation(
    State(state): State<AppState>,
    tenant: Tenant,
    id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, client = tenant.client_identifier(), "Cancelling reservation");

    let result = async move {
        let Path(id) = id?;
        let reservation = state
            .store()
            .transaction(|tables| {
                let reservation = find_owned_mut(
                    &mut tables.reservations,
                    tenant.client_identifier(),
                    "Reservation",
                    id,
                )?;
                if reservation.status == ReservationStatus::Cancelled {
                    return Err(PlatformError::business_rule("Reservation is already cancelled"));
                }
                reservation.status = ReservationStatus::Cancelled;
                Ok(reservation.clone())
            })
            .await?;

        info!(correlation_id = %correlation_id, reservation_id = %reservation.id, "Reservation cancelled");
        Ok::<_, ApiErrorResponse>(success(StatusCode::OK, reservation))
    }
    .await;

    finish(correlation_id, result)
}
