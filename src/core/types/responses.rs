//! Outbound response envelope
//!
//! `make_request` always resolves to an [`ApiResponse`]; failures are
//! carried in the `error` body, never as an `Err` the caller must unwrap
//! differently from the success path.

use crate::utils::error::HubError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured error body on a failed response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Stable machine-readable code, e.g. `RATE_LIMIT_EXCEEDED`
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Optional structured context (offending field, retry-after, status)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Per-response metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// Wall-clock duration of the whole call, retries included
    pub duration_ms: u64,
    /// Whether the payload was served from the response cache
    pub cached: bool,
    /// Retries performed beyond the first attempt
    pub retry_count: u32,
    /// When the response was produced
    pub timestamp: DateTime<Utc>,
    /// Remaining quota echoed from the provider, when surfaced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit_remaining: Option<u64>,
    /// Quota reset hint echoed from the provider, when surfaced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit_reset: Option<u64>,
}

impl ResponseMeta {
    /// Metadata for a response produced right now
    pub fn new(duration_ms: u64, cached: bool, retry_count: u32) -> Self {
        Self {
            duration_ms,
            cached,
            retry_count,
            timestamp: Utc::now(),
            rate_limit_remaining: None,
            rate_limit_reset: None,
        }
    }
}

/// Uniform response shape for every call through the hub
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Whether the call succeeded
    pub success: bool,
    /// Provider payload on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Structured error on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
    /// Call metadata
    pub meta: ResponseMeta,
}

impl ApiResponse {
    /// Successful response carrying a provider payload
    pub fn ok(data: Value, meta: ResponseMeta) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta,
        }
    }

    /// Failed response normalized from a hub error
    pub fn from_error(err: &HubError, meta: ResponseMeta) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiErrorBody {
                code: err.code().to_string(),
                message: err.to_string(),
                details: err.details(),
            }),
            meta,
        }
    }
}
