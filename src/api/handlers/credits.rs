//! Wallet account and credit request endpoints.
//!
//! Every balance change runs inside one store transaction together with
//! its ledger entry, so a failed approval leaves both balances and the
//! request untouched.

use axum::{
    Json,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::Response,
};
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::api::request::{
    CreateCreditAccountRequest, CreateCreditRequest, DatedListQuery, DecisionRequest,
    SpendCreditRequest,
};
use crate::api::response::{ApiErrorResponse, paginated, success};
use crate::api::state::AppState;
use crate::api::tenant::Tenant;
use crate::error::PlatformError;
use crate::models::{
    CreditAccount, CreditLedgerEntry, CreditRequest, CreditRequestStatus, Page, PageRequest,
};
use crate::rules;
use crate::store::{RecordScopes, find_owned, find_owned_mut};

use super::finish;

/// A request together with the account balances after it changed.
#[derive(Debug, Serialize)]
struct RequestOutcome {
    request: CreditRequest,
    account: CreditAccount,
}

/// A spend together with the resulting ledger entry.
#[derive(Debug, Serialize)]
struct SpendOutcome {
    account: CreditAccount,
    entry: CreditLedgerEntry,
}

/// Handler for POST /credit-accounts.
pub(super) async fn create_account(
    State(state): State<AppState>,
    tenant: Tenant,
    payload: Result<Json<CreateCreditAccountRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, client = tenant.client_identifier(), "Opening credit account");

    let result = async move {
        let Json(request) = payload?;
        request.validate()?;

        let account = CreditAccount::open(
            tenant.client_identifier(),
            request.holder_name.trim(),
            Utc::now(),
        );
        let account = state
            .store()
            .transaction(|tables| {
                tables.credit_accounts.insert(account.id, account.clone());
                Ok(account)
            })
            .await?;

        info!(correlation_id = %correlation_id, account_id = %account.id, "Credit account opened");
        Ok::<_, ApiErrorResponse>(success(StatusCode::CREATED, account))
    }
    .await;

    finish(correlation_id, result)
}

/// Handler for GET /credit-accounts/:id.
pub(super) async fn get_account(
    State(state): State<AppState>,
    tenant: Tenant,
    id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, client = tenant.client_identifier(), "Fetching credit account");

    let result = async move {
        let Path(id) = id?;
        let account = state
            .store()
            .read(|tables| {
                find_owned(&tables.credit_accounts, tenant.client_identifier(), "Credit account", id)
                    .cloned()
            })
            .await?;
        Ok::<_, ApiErrorResponse>(success(StatusCode::OK, account))
    }
    .await;

    finish(correlation_id, result)
}

/// Handler for GET /credit-accounts/:id/ledger.
///
/// Entries are listed oldest first.
pub(super) async fn account_ledger(
    State(state): State<AppState>,
    tenant: Tenant,
    id: Result<Path<Uuid>, PathRejection>,
    page: Result<Query<PageRequest>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, client = tenant.client_identifier(), "Listing credit ledger");

    let result = async move {
        let Path(id) = id?;
        let Query(page) = page?;
        let client = tenant.client_identifier();

        let entries = state
            .store()
            .read(|tables| {
                find_owned(&tables.credit_accounts, client, "Credit account", id)?;
                Ok::<_, PlatformError>(
                    tables
                        .credit_ledger
                        .iter()
                        .for_client(client)
                        .filter(|entry| entry.account_id == id)
                        .cloned()
                        .collect::<Vec<_>>(),
                )
            })
            .await?;

        Ok::<_, ApiErrorResponse>(paginated(Page::paginate(entries, page, state.pagination())))
    }
    .await;

    finish(correlation_id, result)
}

/// Handler for POST /credit-accounts/:id/spend.
pub(super) async fn spend(
    State(state): State<AppState>,
    tenant: Tenant,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<SpendCreditRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, client = tenant.client_identifier(), "Spending credit");

    let result = async move {
        let Path(id) = id?;
        let Json(request) = payload?;

        let outcome = state
            .store()
            .transaction(|tables| {
                let account = find_owned_mut(
                    &mut tables.credit_accounts,
                    tenant.client_identifier(),
                    "Credit account",
                    id,
                )?;
                let entry = rules::spend_credit(account, request.amount, request.reference, Utc::now())?;
                let account = account.clone();
                tables.credit_ledger.push(entry.clone());
                Ok(SpendOutcome { account, entry })
            })
            .await?;

        info!(
            correlation_id = %correlation_id,
            account_id = %outcome.account.id,
            amount = %outcome.entry.amount,
            available = %outcome.account.available_credit,
            "Credit spent"
        );
        Ok::<_, ApiErrorResponse>(success(StatusCode::OK, outcome))
    }
    .await;

    finish(correlation_id, result)
}

/// Handler for POST /credit-requests.
pub(super) async fn create_request(
    State(state): State<AppState>,
    tenant: Tenant,
    payload: Result<Json<CreateCreditRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, client = tenant.client_identifier(), "Submitting credit request");

    let result = async move {
        let Json(request) = payload?;

        let outcome = state
            .store()
            .transaction(|tables| {
                let account = find_owned_mut(
                    &mut tables.credit_accounts,
                    tenant.client_identifier(),
                    "Credit account",
                    request.account_id,
                )
                .map_err(|_| PlatformError::validation("account_id", "Credit account does not exist"))?;
                let (credit_request, entry) =
                    rules::submit_request(account, &request.package_name, request.amount, Utc::now())?;
                let account = account.clone();
                tables.credit_requests.insert(credit_request.id, credit_request.clone());
                tables.credit_ledger.push(entry);
                Ok(RequestOutcome {
                    request: credit_request,
                    account,
                })
            })
            .await?;

        info!(
            correlation_id = %correlation_id,
            request_id = %outcome.request.id,
            amount = %outcome.request.amount,
            "Credit request submitted"
        );
        Ok::<_, ApiErrorResponse>(success(StatusCode::CREATED, outcome))
    }
    .await;

    finish(correlation_id, result)
}

/// Handler for GET /credit-requests.
pub(super) async fn list_requests(
    State(state): State<AppState>,
    tenant: Tenant,
    query: Result<Query<DatedListQuery<CreditRequestStatus>>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, client = tenant.client_identifier(), "Listing credit requests");

    let result = async move {
        let Query(query) = query?;
        let range = query.date_range()?;

        let mut requests: Vec<CreditRequest> = state
            .store()
            .read(|tables| {
                tables
                    .credit_requests
                    .values()
                    .for_client(tenant.client_identifier())
                    .with_status(query.status)
                    .between_dates(range)
                    .cloned()
                    .collect()
            })
            .await;
        requests.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));

        Ok::<_, ApiErrorResponse>(paginated(Page::paginate(
            requests,
            query.page_request(),
            state.pagination(),
        )))
    }
    .await;

    finish(correlation_id, result)
}

/// Which decision to apply to a pending request.
#[derive(Debug, Clone, Copy)]
enum Decision {
    Approve,
    Reject,
}

/// Handler for POST /credit-requests/:id/approve.
pub(super) async fn approve_request(
    State(state): State<AppState>,
    tenant: Tenant,
    id: Result<Path<Uuid>, PathRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let note = decision_note(&headers, &body);
    decide(state, tenant, id, note, Decision::Approve).await
}

/// Handler for POST /credit-requests/:id/reject.
pub(super) async fn reject_request(
    State(state): State<AppState>,
    tenant: Tenant,
    id: Result<Path<Uuid>, PathRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let note = decision_note(&headers, &body);
    decide(state, tenant, id, note, Decision::Reject).await
}

/// Reads the optional decision body.
///
/// An empty body or one sent without a content type carries no note;
/// anything else must be a valid [`DecisionRequest`].
fn decision_note(headers: &HeaderMap, body: &Bytes) -> Result<Option<String>, JsonRejection> {
    if !headers.contains_key(CONTENT_TYPE) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let Json(request) = Json::<DecisionRequest>::from_bytes(body)?;
    Ok(request.note)
}

async fn decide(
    state: AppState,
    tenant: Tenant,
    id: Result<Path<Uuid>, PathRejection>,
    note: Result<Option<String>, JsonRejection>,
    decision: Decision,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        client = tenant.client_identifier(),
        decision = ?decision,
        "Deciding credit request"
    );

    let result = async move {
        let Path(id) = id?;
        let note = note?;
        let client = tenant.client_identifier();

        let outcome = state
            .store()
            .transaction(|tables| {
                let request = find_owned_mut(&mut tables.credit_requests, client, "Credit request", id)?;
                let account = find_owned_mut(
                    &mut tables.credit_accounts,
                    client,
                    "Credit account",
                    request.account_id,
                )?;

                let now = Utc::now();
                let entry = match decision {
                    Decision::Approve => rules::approve_request(account, request, now, note)?,
                    Decision::Reject => rules::reject_request(account, request, now, note)?,
                };
                let outcome = RequestOutcome {
                    request: request.clone(),
                    account: account.clone(),
                };
                tables.credit_ledger.push(entry);
                Ok(outcome)
            })
            .await?;

        info!(
            correlation_id = %correlation_id,
            request_id = %outcome.request.id,
            status = %outcome.request.status,
            available = %outcome.account.available_credit,
            pending = %outcome.account.pending_credit,
            "Credit request decided"
        );
        Ok::<_, ApiErrorResponse>(success(StatusCode::OK, outcome))
    }
    .await;

    finish(correlation_id, result)
}
