//! Response envelopes and error mapping for the HTTP API.
//!
//! Success bodies are `{"status":"success","data":...}` (lists add
//! `"meta"`); error bodies are `{"status":"error","code","message",...}`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::error;

use crate::error::PlatformError;
use crate::models::{Page, PageMeta};

/// Success envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSuccess<T> {
    /// Always `"success"`.
    pub status: String,
    /// The payload.
    pub data: T,
    /// Page metadata for list endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

/// Wraps `data` in a success envelope with the given status code.
pub fn success<T: Serialize>(status: StatusCode, data: T) -> Response {
    let body = ApiSuccess {
        status: "success".to_string(),
        data,
        meta: None,
    };
    (status, Json(body)).into_response()
}

/// Wraps a page of records in a list envelope.
pub fn paginated<T: Serialize>(page: Page<T>) -> Response {
    let body = ApiSuccess {
        status: "success".to_string(),
        data: page.data,
        meta: Some(page.meta),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Always `"error"`.
    pub status: String,
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Field-level messages for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
    /// Optional details about the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            code: code.into(),
            message: message.into(),
            errors: None,
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a validation error for one field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut errors = BTreeMap::new();
        errors.insert(field.into(), vec![message]);
        Self {
            errors: Some(errors),
            ..Self::new("VALIDATION_ERROR", "The given data was invalid.")
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 422 validation error for one field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            error: ApiError::validation(field, message),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<PlatformError> for ApiErrorResponse {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            PlatformError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            e @ PlatformError::TenantNotFound { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("TENANT_NOT_FOUND", e.to_string()),
            },
            e @ PlatformError::ModuleNotConfigured { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("MODULE_NOT_CONFIGURED", e.to_string()),
            },
            ref e @ PlatformError::RateNotFound { ref field, .. } => {
                ApiErrorResponse::validation(field.clone(), e.to_string())
            }
            PlatformError::Validation { field, message } => {
                ApiErrorResponse::validation(field, message)
            }
            e @ PlatformError::NotFound { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("NOT_FOUND", e.to_string()),
            },
            PlatformError::BusinessRule { message } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::new("BUSINESS_RULE_VIOLATION", message),
            },
            PlatformError::Persistence { message } => {
                error!(error = %message, "Persistence failure");
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::new(
                        "SERVER_ERROR",
                        "The request could not be completed. No changes were saved.",
                    ),
                }
            }
        }
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                let (field, message) = field_error(&err.body_text(), "body");
                ApiErrorResponse::validation(field, message)
            }
            JsonRejection::JsonSyntaxError(err) => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::malformed_json(format!("Invalid JSON syntax: {}", err.body_text())),
            },
            JsonRejection::MissingJsonContentType(_) => ApiErrorResponse {
                status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
                error: ApiError::new(
                    "MISSING_CONTENT_TYPE",
                    "Content-Type must be application/json",
                ),
            },
            _ => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::malformed_json("Failed to parse request body"),
            },
        }
    }
}

impl From<QueryRejection> for ApiErrorResponse {
    fn from(rejection: QueryRejection) -> Self {
        let (field, message) = field_error(&rejection.body_text(), "query");
        ApiErrorResponse::validation(field, message)
    }
}

impl From<PathRejection> for ApiErrorResponse {
    fn from(rejection: PathRejection) -> Self {
        ApiErrorResponse {
            status: StatusCode::NOT_FOUND,
            error: ApiError::new("NOT_FOUND", rejection.body_text()),
        }
    }
}

/// Splits a serde error text into the offending field and a message.
///
/// Handles `"distance_km: invalid type: ..."`, `"missing field `x`"` and
/// nested `"dimensions_cm: missing field `height`"` forms, with or without
/// axum's "Failed to deserialize ..." prefix.
fn field_error(text: &str, fallback: &str) -> (String, String) {
    let text = text
        .split_once("target type: ")
        .map(|(_, rest)| rest)
        .or_else(|| text.split_once("query string: ").map(|(_, rest)| rest))
        .unwrap_or(text);
    let text = match text.rfind(" at line ") {
        Some(idx) => &text[..idx],
        None => text,
    };

    let (path, message) = match text.split_once(": ") {
        Some((path, rest)) if !path.contains(' ') => (Some(path), rest),
        _ => (None, text),
    };

    if let Some(name) = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
    {
        let field = match path {
            Some(path) => format!("{}.{}", path, name),
            None => name.to_string(),
        };
        return (field, "is required".to_string());
    }

    (path.unwrap_or(fallback).to_string(), message.to_string())
}
