//! Error types for the BizHub platform.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the platform can report, from configuration loading
//! through request validation and ledger business rules.

use thiserror::Error;

/// The main error type for the platform.
///
/// All fallible operations return this error type. The API layer maps each
/// variant onto an HTTP status and JSON error body.
///
/// # Example
///
/// ```
/// use bizhub::error::PlatformError;
///
/// let error = PlatformError::TenantNotFound {
///     client_identifier: "acme".to_string(),
/// };
/// assert_eq!(error.to_string(), "Tenant not found: acme");
/// ```
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No tenant is configured for the given client identifier.
    #[error("Tenant not found: {client_identifier}")]
    TenantNotFound {
        /// The client identifier that was not found.
        client_identifier: String,
    },

    /// The tenant exists but has no configuration for the requested module.
    #[error("Module '{module}' is not configured for tenant '{client_identifier}'")]
    ModuleNotConfigured {
        /// The tenant's client identifier.
        client_identifier: String,
        /// The module name (e.g. "transportation").
        module: String,
    },

    /// A rate table has no row for the requested code.
    #[error("No {kind} rate configured for '{code}'")]
    RateNotFound {
        /// The request field holding the code.
        field: String,
        /// The kind of rate (e.g. "vehicle", "service level").
        kind: String,
        /// The code that was looked up.
        code: String,
    },

    /// A request field failed validation.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A record was not found (or belongs to another tenant).
    #[error("{resource} not found: {id}")]
    NotFound {
        /// The kind of record (e.g. "Patient").
        resource: String,
        /// The requested identifier.
        id: String,
    },

    /// The operation violates a business rule.
    #[error("{message}")]
    BusinessRule {
        /// A description of the violated rule.
        message: String,
    },

    /// The record store failed to read or write its snapshot.
    #[error("Persistence error: {message}")]
    Persistence {
        /// A description of the failure.
        message: String,
    },
}

impl PlatformError {
    /// Shorthand for a [`PlatformError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`PlatformError::NotFound`].
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    /// Shorthand for a [`PlatformError::BusinessRule`].
    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::BusinessRule {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return PlatformError.
pub type PlatformResult<T> = Result<T, PlatformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = PlatformError::ConfigNotFound {
            path: "/missing/platform.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/platform.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = PlatformError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_module_not_configured_displays_module_and_tenant() {
        let error = PlatformError::ModuleNotConfigured {
            client_identifier: "smile-dental".to_string(),
            module: "transportation".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Module 'transportation' is not configured for tenant 'smile-dental'"
        );
    }

    #[test]
    fn test_rate_not_found_displays_kind_and_code() {
        let error = PlatformError::RateNotFound {
            field: "vehicle_type".to_string(),
            kind: "vehicle".to_string(),
            code: "hovercraft".to_string(),
        };
        assert_eq!(error.to_string(), "No vehicle rate configured for 'hovercraft'");
    }

    #[test]
    fn test_validation_helper_builds_field_error() {
        let error = PlatformError::validation("distance_km", "must not be negative");
        assert_eq!(
            error.to_string(),
            "Invalid field 'distance_km': must not be negative"
        );
    }

    #[test]
    fn test_not_found_helper() {
        let error = PlatformError::not_found("Patient", "abc");
        assert_eq!(error.to_string(), "Patient not found: abc");
    }

    #[test]
    fn test_business_rule_displays_message_only() {
        let error = PlatformError::business_rule("Credit request has already been approved");
        assert_eq!(error.to_string(), "Credit request has already been approved");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PlatformError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_tenant_not_found() -> PlatformResult<()> {
            Err(PlatformError::TenantNotFound {
                client_identifier: "ghost".to_string(),
            })
        }

        fn propagates_error() -> PlatformResult<()> {
            returns_tenant_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
