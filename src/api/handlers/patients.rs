//! Clinic patient endpoints.

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
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::api::request::{CreatePatientRequest, PatientListQuery, UpdateVipRequest};
use crate::api::response::{ApiErrorResponse, paginated, success};
use crate::api::state::AppState;
use crate::api::tenant::Tenant;
use crate::config::VipTierRates;
use crate::error::PlatformResult;
use crate::models::{Page, Patient};
use crate::rules::{CodeKind, validate_discount_percent, vip_discount_percent};
use crate::store::{RecordScopes, find_owned, find_owned_mut};

use super::{finish, today};

/// A patient with the discount and priority derived from their tier.
#[derive(Debug, Serialize)]
struct PatientView {
    #[serde(flatten)]
    patient: Patient,
    discount_percent: Decimal,
    priority: bool,
}

impl PatientView {
    fn new(patient: Patient, rates: &VipTierRates) -> PlatformResult<Self> {
        let discount_percent =
            vip_discount_percent(patient.vip_tier, patient.vip_discount_override, rates)?;
        Ok(Self {
            priority: patient.vip_tier.is_priority(),
            discount_percent,
            patient,
        })
    }
}

/// Handler for POST /patients.
pub(super) async fn create_patient(
    State(state): State<AppState>,
    tenant: Tenant,
    payload: Result<Json<CreatePatientRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, client = tenant.client_identifier(), "Creating patient");

    let result = async move {
        let Json(request) = payload?;
        request.validate()?;
        if let Some(percent) = request.vip_discount_override {
            validate_discount_percent("vip_discount_override", percent)?;
        }
        let rates = state.config().vip_tier_rates(tenant.client_identifier())?;

        let client = tenant.client_identifier();
        let codes = &tenant.config().codes;
        let date = today();
        let patient = state
            .store()
            .transaction(|tables| {
                let seq = tables.next_sequence(client, CodeKind::Arn, &CodeKind::Arn.scope(date));
                let patient = Patient {
                    id: Uuid::new_v4(),
                    client_identifier: client.to_string(),
                    arn: CodeKind::Arn.format(codes, date, seq),
                    first_name: request.first_name.trim().to_string(),
                    last_name: request.last_name.trim().to_string(),
                    email: request.email,
                    phone: request.phone,
                    date_of_birth: request.date_of_birth,
                    vip_tier: request.vip_tier,
                    vip_discount_override: request.vip_discount_override,
                    created_at: Utc::now(),
                };
                tables.patients.insert(patient.id, patient.clone());
                Ok(patient)
            })
            .await?;

        info!(correlation_id = %correlation_id, arn = %patient.arn, "Patient created");
        Ok::<_, ApiErrorResponse>(success(StatusCode::CREATED, PatientView::new(patient, &rates)?))
    }
    .await;

    finish(correlation_id, result)
}

/// Handler for GET /patients.
///
/// Priority tiers are listed first (platinum, gold, silver, regular), then
/// by name.
pub(super) async fn list_patients(
    State(state): State<AppState>,
    tenant: Tenant,
    query: Result<Query<PatientListQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, client = tenant.client_identifier(), "Listing patients");

    let result = async move {
        let Query(query) = query?;
        let rates = state.config().vip_tier_rates(tenant.client_identifier())?;

        let mut patients: Vec<Patient> = state
            .store()
            .read(|tables| {
                tables
                    .patients
                    .values()
                    .for_client(tenant.client_identifier())
                    .filter(|p| query.vip_tier.is_none_or(|tier| p.vip_tier == tier))
                    .cloned()
                    .collect()
            })
            .await;
        patients.sort_by(|a, b| {
            (a.vip_tier.priority_rank(), &a.last_name, &a.first_name)
                .cmp(&(b.vip_tier.priority_rank(), &b.last_name, &b.first_name))
        });

        let views = patients
            .into_iter()
            .map(|p| PatientView::new(p, &rates))
            .collect::<PlatformResult<Vec<_>>>()?;

        Ok::<_, ApiErrorResponse>(paginated(Page::paginate(
            views,
            query.page_request(),
            state.pagination(),
        )))
    }
    .await;

    finish(correlation_id, result)
}

/// Handler for GET /patients/:id.
pub(super) async fn get_patient(
    State(state): State<AppState>,
    tenant: Tenant,
    id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, client = tenant.client_identifier(), "Fetching patient");

    let result = async move {
        let Path(id) = id?;
        let rates = state.config().vip_tier_rates(tenant.client_identifier())?;
        let patient = state
            .store()
            .read(|tables| {
                find_owned(&tables.patients, tenant.client_identifier(), "Patient", id).cloned()
            })
            .await?;
        Ok::<_, ApiErrorResponse>(success(StatusCode::OK, PatientView::new(patient, &rates)?))
    }
    .await;

    finish(correlation_id, result)
}

/// Handler for PUT /patients/:id/vip.
pub(super) async fn update_vip(
    State(state): State<AppState>,
    tenant: Tenant,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateVipRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, client = tenant.client_identifier(), "Updating VIP tier");

    let result = async move {
        let Path(id) = id?;
        let Json(request) = payload?;
        if let Some(percent) = request.vip_discount_override {
            validate_discount_percent("vip_discount_override", percent)?;
        }
        let rates = state.config().vip_tier_rates(tenant.client_identifier())?;

        let patient = state
            .store()
            .transaction(|tables| {
                let patient =
                    find_owned_mut(&mut tables.patients, tenant.client_identifier(), "Patient", id)?;
                patient.vip_tier = request.vip_tier;
                patient.vip_discount_override = request.vip_discount_override;
                Ok(patient.clone())
            })
            .await?;

        info!(
            correlation_id = %correlation_id,
            arn = %patient.arn,
            vip_tier = ?patient.vip_tier,
            "VIP tier updated"
        );
        Ok::<_, ApiErrorResponse>(success(StatusCode::OK, PatientView::new(patient, &rates)?))
    }
    .await;

    finish(correlation_id, result)
}
