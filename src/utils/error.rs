//! Error handling for the hub
//!
//! All failure modes that can surface from a request flow through
//! [`HubError`]. The orchestrator never lets one escape `make_request`;
//! each variant is normalized into a structured error body with a stable
//! string code so callers can branch without type inspection.

use serde_json::json;
use thiserror::Error;

/// Result type alias for the hub
pub type Result<T, E = HubError> = std::result::Result<T, E>;

/// Parameter validation failures
///
/// Raised strictly before any network I/O or rate-limit consumption, in
/// parameter declaration order, failing on the first violation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required parameter was not supplied
    #[error("missing required parameter `{field}`")]
    MissingParameter {
        /// Name of the absent parameter
        field: String,
    },

    /// A parameter was supplied with the wrong semantic type
    #[error("parameter `{field}` must be of type {expected}")]
    TypeMismatch {
        /// Name of the offending parameter
        field: String,
        /// Expected semantic type name
        expected: String,
    },

    /// A well-typed parameter violated a declared constraint
    #[error("parameter `{field}` violates constraint: {message}")]
    ConstraintViolation {
        /// Name of the offending parameter
        field: String,
        /// Human-readable description of the violated constraint
        message: String,
    },
}

impl ValidationError {
    /// Name of the parameter this error refers to
    pub fn field(&self) -> &str {
        match self {
            Self::MissingParameter { field }
            | Self::TypeMismatch { field, .. }
            | Self::ConstraintViolation { field, .. } => field,
        }
    }
}

/// Main error type for the hub
#[derive(Error, Debug)]
pub enum HubError {
    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// No provider registered under the given id
    #[error("unknown provider `{0}`")]
    ProviderNotFound(String),

    /// Provider exists but does not expose the given endpoint
    #[error("unknown endpoint `{endpoint}` on provider `{provider}`")]
    EndpointNotFound {
        /// Provider id that was looked up
        provider: String,
        /// Endpoint id that was not found
        endpoint: String,
    },

    /// Request parameters failed validation against endpoint metadata
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No active credential, or credential probe failure
    #[error("credential error: {0}")]
    Credential(String),

    /// Admitting the request would exceed the provider's quota
    #[error("rate limit exceeded, retry after {retry_after_ms}ms")]
    RateLimitExceeded {
        /// Milliseconds until the current window resets
        retry_after_ms: u64,
    },

    /// Network or timeout failure from a single attempt
    #[error("transport error: {0}")]
    Transport(String),

    /// Provider answered with a non-2xx HTTP status
    #[error("provider returned HTTP {status}: {body}")]
    Provider {
        /// HTTP status code from the provider
        status: u16,
        /// Response body (truncated) for diagnostics
        body: String,
    },

    /// The retry budget was exhausted without a successful attempt
    #[error("max retries exceeded after {attempts} retries: {last}")]
    MaxRetriesExceeded {
        /// Number of retries performed (not counting the first attempt)
        attempts: u32,
        /// Message of the final attempt's error
        last: String,
    },

    /// The circuit breaker refuses traffic to this provider
    #[error("provider `{0}` unavailable: circuit open")]
    CircuitOpen(String),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HubError {
    /// Stable machine-readable code for the response error body
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::ProviderNotFound(_) => "PROVIDER_NOT_FOUND",
            Self::EndpointNotFound { .. } => "ENDPOINT_NOT_FOUND",
            Self::Validation(ValidationError::MissingParameter { .. }) => "MISSING_PARAMETER",
            Self::Validation(ValidationError::TypeMismatch { .. }) => "TYPE_MISMATCH",
            Self::Validation(ValidationError::ConstraintViolation { .. }) => {
                "CONSTRAINT_VIOLATION"
            }
            Self::Credential(_) => "CREDENTIAL_ERROR",
            Self::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Provider { .. } => "PROVIDER_ERROR",
            Self::MaxRetriesExceeded { .. } => "MAX_RETRIES_EXCEEDED",
            Self::CircuitOpen(_) => "CIRCUIT_OPEN",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Structured details attached to the response error body
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Validation(err) => Some(json!({ "field": err.field() })),
            Self::RateLimitExceeded { retry_after_ms } => {
                Some(json!({ "retry_after_ms": retry_after_ms }))
            }
            Self::Provider { status, .. } => Some(json!({ "status": status })),
            Self::MaxRetriesExceeded { attempts, .. } => Some(json!({ "retries": attempts })),
            _ => None,
        }
    }

    /// Number of retries the request performed before failing
    pub fn retry_count(&self) -> u32 {
        match self {
            Self::MaxRetriesExceeded { attempts, .. } => *attempts,
            _ => 0,
        }
    }
}
