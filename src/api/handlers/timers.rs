//! Session timer endpoints.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::Response,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::api::request::StartTimerRequest;
use crate::api::response::{ApiErrorResponse, success};
use crate::api::state::AppState;
use crate::api::tenant::Tenant;
use crate::error::PlatformResult;
use crate::models::SessionTimer;
use crate::rules::{billable_seconds, pause_timer, resume_timer, start_timer, stop_timer};
use crate::store::{find_owned, find_owned_mut};

use super::finish;

/// A timer with its billable time as of the response.
#[derive(Debug, Serialize)]
struct TimerView {
    #[serde(flatten)]
    timer: SessionTimer,
    billable_seconds: i64,
}

impl TimerView {
    fn at(timer: SessionTimer, now: DateTime<Utc>) -> Self {
        Self {
            billable_seconds: billable_seconds(&timer, now),
            timer,
        }
    }
}

/// Handler for POST /timers.
pub(super) async fn start(
    State(state): State<AppState>,
    tenant: Tenant,
    payload: Result<Json<StartTimerRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, client = tenant.client_identifier(), "Starting timer");

    let result = async move {
        let Json(request) = payload?;
        let now = Utc::now();
        let timer = start_timer(
            tenant.client_identifier(),
            request.label.trim(),
            request.hourly_rate,
            now,
        )?;
        let timer = state
            .store()
            .transaction(|tables| {
                tables.timers.insert(timer.id, timer.clone());
                Ok(timer)
            })
            .await?;

        info!(correlation_id = %correlation_id, timer_id = %timer.id, label = %timer.label, "Timer started");
        Ok::<_, ApiErrorResponse>(success(StatusCode::CREATED, TimerView::at(timer, now)))
    }
    .await;

    finish(correlation_id, result)
}

/// Handler for GET /timers/:id.
pub(super) async fn show(
    State(state): State<AppState>,
    tenant: Tenant,
    id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, client = tenant.client_identifier(), "Fetching timer");

    let result = async move {
        let Path(id) = id?;
        let timer = state
            .store()
            .read(|tables| find_owned(&tables.timers, tenant.client_identifier(), "Timer", id).cloned())
            .await?;
        Ok::<_, ApiErrorResponse>(success(StatusCode::OK, TimerView::at(timer, Utc::now())))
    }
    .await;

    finish(correlation_id, result)
}

/// Handler for POST /timers/:id/pause.
pub(super) async fn pause(
    State(state): State<AppState>,
    tenant: Tenant,
    id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    transition(state, tenant, id, "pause", pause_timer).await
}

/// Handler for POST /timers/:id/resume.
pub(super) async fn resume(
    State(state): State<AppState>,
    tenant: Tenant,
    id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    transition(state, tenant, id, "resume", resume_timer).await
}

/// Handler for POST /timers/:id/stop.
pub(super) async fn stop(
    State(state): State<AppState>,
    tenant: Tenant,
    id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    transition(state, tenant, id, "stop", stop_timer).await
}

async fn transition(
    state: AppState,
    tenant: Tenant,
    id: Result<Path<Uuid>, PathRejection>,
    action: &'static str,
    apply: fn(&mut SessionTimer, DateTime<Utc>) -> PlatformResult<()>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        client = tenant.client_identifier(),
        action,
        "Updating timer"
    );

    let result = async move {
        let Path(id) = id?;
        let now = Utc::now();
        let timer = state
            .store()
            .transaction(|tables| {
                let timer = find_owned_mut(&mut tables.timers, tenant.client_identifier(), "Timer", id)?;
                apply(timer, now)?;
                Ok(timer.clone())
            })
            .await?;

        info!(
            correlation_id = %correlation_id,
            timer_id = %timer.id,
            status = %timer.status,
            charge = ?timer.charge,
            "Timer updated"
        );
        Ok::<_, ApiErrorResponse>(success(StatusCode::OK, TimerView::at(timer, now)))
    }
    .await;

    finish(correlation_id, result)
}
