//! Inbound request envelope

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// Scheduling priority of a request
///
/// Recorded on the envelope and reserved for the queue-drain tick; it does
/// not affect execution order today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

/// One call through the hub
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRequest {
    /// Unique request id
    pub id: Uuid,
    /// Target provider id
    pub provider_id: String,
    /// Target endpoint id within the provider
    pub endpoint_id: String,
    /// Arguments validated against the endpoint's declared parameters
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Extra headers merged into the outbound call
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    /// Per-attempt timeout override (milliseconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Retry budget override; falls back to the hub default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
    /// Scheduling priority
    #[serde(default)]
    pub priority: Priority,
    /// Caller-attached metadata, echoed nowhere, logged for diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl ApiRequest {
    /// Create a request for the given provider endpoint with no parameters
    pub fn new(provider_id: impl Into<String>, endpoint_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            provider_id: provider_id.into(),
            endpoint_id: endpoint_id.into(),
            parameters: Map::new(),
            headers: HashMap::new(),
            timeout_ms: None,
            retries: None,
            priority: Priority::default(),
            metadata: None,
        }
    }

    /// Attach a parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Attach an outbound header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Override the per-attempt timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Override the retry budget
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Set the scheduling priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}
