//! Tenant resolution from the `X-Client-Identifier` header.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::config::TenantConfig;

use super::response::ApiErrorResponse;
use super::state::AppState;

/// Header carrying the tenant's client identifier.
pub const CLIENT_IDENTIFIER_HEADER: &str = "x-client-identifier";

/// The tenant a request is scoped to.
///
/// A missing or blank header is a 422 validation error on
/// `client_identifier`; an unknown identifier is a 404.
#[derive(Debug, Clone)]
pub struct Tenant(pub TenantConfig);

impl Tenant {
    /// The tenant's client identifier.
    pub fn client_identifier(&self) -> &str {
        &self.0.client_identifier
    }

    /// The tenant's configuration.
    pub fn config(&self) -> &TenantConfig {
        &self.0
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Tenant {
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let client = parts
            .headers
            .get(CLIENT_IDENTIFIER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                ApiErrorResponse::validation(
                    "client_identifier",
                    "The X-Client-Identifier header is required",
                )
            })?;

        let tenant = state.config().tenant(client)?;
        Ok(Tenant(tenant.clone()))
    }
}
