//! Patient billing endpoints.

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

use crate::api::request::{CreateBillRequest, DatedListQuery};
use crate::api::response::{ApiErrorResponse, paginated, success};
use crate::api::state::AppState;
use crate::api::tenant::Tenant;
use crate::error::PlatformError;
use crate::models::{BillStatus, Page, PatientBill};
use crate::rules::{CodeKind, apply_vip_discount, items_total, vip_discount_percent};
use crate::store::{RecordScopes, find_owned, find_owned_mut};

use super::{finish, today};

/// Handler for POST /bills.
///
/// Totals the items, applies the patient's VIP discount and allocates a
/// bill number, all in one transaction.
pub(super) async fn create_bill(
    State(state): State<AppState>,
    tenant: Tenant,
    payload: Result<Json<CreateBillRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, client = tenant.client_identifier(), "Creating bill");

    let result = async move {
        let Json(request) = payload?;
        let subtotal = items_total(&request.items)?;
        let rates = state.config().vip_tier_rates(tenant.client_identifier())?;

        let client = tenant.client_identifier();
        let codes = &tenant.config().codes;
        let issued_on = request.issued_on.unwrap_or_else(today);

        let bill = state
            .store()
            .transaction(|tables| {
                let patient = find_owned(&tables.patients, client, "Patient", request.patient_id)
                    .map_err(|_| PlatformError::validation("patient_id", "Patient does not exist"))?;
                let percent =
                    vip_discount_percent(patient.vip_tier, patient.vip_discount_override, &rates)?;
                let (discount_amount, total) = apply_vip_discount(subtotal, percent);

                let seq = tables.next_sequence(client, CodeKind::Bill, &CodeKind::Bill.scope(issued_on));
                let bill = PatientBill {
                    id: Uuid::new_v4(),
                    client_identifier: client.to_string(),
                    bill_number: CodeKind::Bill.format(codes, issued_on, seq),
                    patient_id: request.patient_id,
                    items: request.items,
                    subtotal,
                    discount_percent: percent,
                    discount_amount,
                    total,
                    status: BillStatus::Unpaid,
                    issued_on,
                    paid_at: None,
                };
                tables.bills.insert(bill.id, bill.clone());
                Ok(bill)
            })
            .await?;

        info!(
            correlation_id = %correlation_id,
            bill_number = %bill.bill_number,
            total = %bill.total,
            discount = %bill.discount_amount,
            "Bill created"
        );
        Ok::<_, ApiErrorResponse>(success(StatusCode::CREATED, bill))
    }
    .await;

    finish(correlation_id, result)
}

/// Handler for GET /bills.
pub(super) async fn list_bills(
    State(state): State<AppState>,
    tenant: Tenant,
    query: Result<Query<DatedListQuery<BillStatus>>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, client = tenant.client_identifier(), "Listing bills");

    let result = async move {
        let Query(query) = query?;
        let range = query.date_range()?;

        let mut bills: Vec<PatientBill> = state
            .store()
            .read(|tables| {
                tables
                    .bills
                    .values()
                    .for_client(tenant.client_identifier())
                    .with_status(query.status)
                    .between_dates(range)
                    .cloned()
                    .collect()
            })
            .await;
        bills.sort_by(|a, b| b.bill_number.cmp(&a.bill_number));

        Ok::<_, ApiErrorResponse>(paginated(Page::paginate(
            bills,
            query.page_request(),
            state.pagination(),
        )))
    }
    .await;

    finish(correlation_id, result)
}

/// Handler for POST /bills/:id/pay.
pub(super) async fn pay_bill(
    State(state): State<AppState>,
    tenant: Tenant,
    id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, client = tenant.client_identifier(), "Paying bill");

    let result = async move {
        let Path(id) = id?;
        let bill = state
            .store()
            .transaction(|tables| {
                let bill = find_owned_mut(&mut tables.bills, tenant.client_identifier(), "Bill", id)?;
                if bill.status == BillStatus::Paid {
                    return Err(PlatformError::business_rule("Bill has already been paid"));
                }
                bill.status = BillStatus::Paid;
                bill.paid_at = Some(Utc::now());
                Ok(bill.clone())
            })
            .await?;

        info!(correlation_id = %correlation_id, bill_number = %bill.bill_number, "Bill paid");
        Ok::<_, ApiErrorResponse>(success(StatusCode::OK, bill))
    }
    .await;

    finish(correlation_id, result)
}
