//! Provider and endpoint metadata
//!
//! Definitions are immutable once registered; the registry hands out
//! `Arc<Provider>` so concurrent callers share one copy.

use crate::core::types::HttpMethod;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category of an external provider, used for filtered listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderCategory {
    AiCompletion,
    Seo,
    Analytics,
    Marketing,
    Messaging,
}

/// Authentication scheme a provider expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthType {
    ApiKey,
    OAuth,
    Bearer,
    Basic,
}

/// Lifecycle status of a provider definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    #[default]
    Active,
    Inactive,
    Deprecated,
}

/// Quota a provider enforces: at most `requests_allowed` calls per window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    /// Requests admitted per window
    pub requests_allowed: u32,
    /// Window length in milliseconds
    pub window_ms: u64,
}

/// Semantic type of a declared parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl ParamType {
    /// Type name used in validation messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Whether a JSON value inhabits this semantic type
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }
}

/// One declared argument of an endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Argument name
    pub name: String,
    /// Semantic type
    pub param_type: ParamType,
    /// Whether the argument must be supplied
    pub required: bool,
    /// Lower bound for numeric parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound for numeric parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Regex a string parameter must match in full
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Closed set of accepted values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<Value>>,
}

impl Parameter {
    /// A required parameter with no extra constraints
    pub fn required(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: true,
            min: None,
            max: None,
            pattern: None,
            allowed_values: None,
        }
    }

    /// An optional parameter with no extra constraints
    pub fn optional(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type)
        }
    }

    /// Constrain the minimum numeric value
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Constrain the maximum numeric value
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Constrain string values to a regex
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Constrain values to a closed set
    pub fn with_allowed_values(mut self, values: Vec<Value>) -> Self {
        self.allowed_values = Some(values);
        self
    }
}

/// One callable operation exposed by a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    /// Id unique within the provider
    pub id: String,
    /// Path template appended to the provider base URL
    pub path: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Human description
    pub description: String,
    /// Declared arguments, in validation order
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Whether responses may be cached. Mutating endpoints must never be
    /// marked cacheable; the registry does not second-guess definitions.
    #[serde(default)]
    pub cacheable: bool,
    /// TTL override for this endpoint's cache entries (milliseconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_ttl_ms: Option<u64>,
    /// Whether failed calls may be retried
    #[serde(default)]
    pub retryable: bool,
    /// Per-attempt timeout override (milliseconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Endpoint {
    /// A non-cacheable, non-retryable endpoint with no parameters
    pub fn new(id: impl Into<String>, path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            method,
            description: String::new(),
            parameters: Vec::new(),
            cacheable: false,
            cache_ttl_ms: None,
            retryable: false,
            timeout_ms: None,
        }
    }

    /// Set the human description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declare the endpoint's parameters
    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Mark responses cacheable with the given TTL
    pub fn cacheable_for_ms(mut self, ttl_ms: u64) -> Self {
        self.cacheable = true;
        self.cache_ttl_ms = Some(ttl_ms);
        self
    }

    /// Mark failures retryable
    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }

    /// Set the per-attempt timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// One external API vendor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    /// Registry id
    pub id: String,
    /// Display name
    pub name: String,
    /// Category for filtered listings
    pub category: ProviderCategory,
    /// Base URL all endpoint paths are resolved against
    pub base_url: String,
    /// Authentication scheme
    pub auth_type: AuthType,
    /// Quota this provider enforces
    pub rate_limit: RateLimit,
    /// Callable operations, ordered
    pub endpoints: Vec<Endpoint>,
    /// Lifecycle status
    #[serde(default)]
    pub status: ProviderStatus,
    /// Routing priority, reserved for load balancing
    #[serde(default)]
    pub priority: u8,
    /// Observed reliability score, reserved for load balancing
    #[serde(default)]
    pub reliability: f32,
    /// Endpoint id used for credential probes and connection tests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_endpoint: Option<String>,
}

impl Provider {
    /// Look up an endpoint by id
    pub fn endpoint(&self, id: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.id == id)
    }

    /// The endpoint designated for probes, when one is configured
    pub fn probe_endpoint(&self) -> Option<&Endpoint> {
        self.test_endpoint.as_deref().and_then(|id| self.endpoint(id))
    }
}
