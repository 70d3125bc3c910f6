//! Hub configuration
//!
//! The hub is configured through an in-memory structure owned by the
//! caller's composition root; there is no ambient global and no file
//! format. All fields carry serde defaults so partial documents
//! deserialize into a working configuration.

use serde::{Deserialize, Serialize};

fn default_max_concurrent_requests() -> usize {
    10
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1_000
}

fn default_true() -> bool {
    true
}

fn default_cache_ttl_ms() -> u64 {
    300_000
}

fn default_rate_limit_buffer_percent() -> u8 {
    10
}

fn default_max_error_rate() -> f64 {
    0.05
}

fn default_max_response_time_ms() -> u64 {
    5_000
}

fn default_min_availability() -> f64 {
    0.99
}

/// Load-balancing strategy across multiple credentials/providers
///
/// Parsed and stored but not yet wired to routing; multi-credential
/// failover is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadBalancing {
    /// Rotate through candidates in order
    #[default]
    RoundRobin,
    /// Prefer candidates by configured weight
    Weighted,
    /// Prefer the candidate with the fewest requests in flight
    LeastConnections,
}

/// Thresholds consumed by the performance monitor collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringThresholds {
    /// Error-rate ceiling before a provider is considered unhealthy
    #[serde(default = "default_max_error_rate")]
    pub max_error_rate: f64,
    /// Response-time ceiling in milliseconds
    #[serde(default = "default_max_response_time_ms")]
    pub max_response_time_ms: u64,
    /// Availability floor (0.0 to 1.0)
    #[serde(default = "default_min_availability")]
    pub min_availability: f64,
}

impl Default for MonitoringThresholds {
    fn default() -> Self {
        Self {
            max_error_rate: default_max_error_rate(),
            max_response_time_ms: default_max_response_time_ms(),
            min_availability: default_min_availability(),
        }
    }
}

/// Hub configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Upper bound on requests in flight
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    /// Fallback per-attempt timeout when neither the request nor the
    /// endpoint specifies one (milliseconds)
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,
    /// Default retry budget for retryable endpoints
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Base backoff delay (milliseconds); doubles per attempt
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Whether cacheable endpoint responses are cached at all
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
    /// Fallback TTL for cacheable endpoints without their own
    /// (milliseconds)
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,
    /// Safety margin below each provider's advertised quota (percent)
    #[serde(default = "default_rate_limit_buffer_percent")]
    pub rate_limit_buffer_percent: u8,
    /// Reserved: route around unhealthy providers of the same category
    #[serde(default)]
    pub failover_enabled: bool,
    /// Reserved: strategy for multi-credential routing
    #[serde(default)]
    pub load_balancing: LoadBalancing,
    /// Thresholds handed to the monitoring collaborator
    #[serde(default)]
    pub monitoring: MonitoringThresholds,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: default_max_concurrent_requests(),
            default_timeout_ms: default_timeout_ms(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            cache_enabled: true,
            cache_ttl_ms: default_cache_ttl_ms(),
            rate_limit_buffer_percent: default_rate_limit_buffer_percent(),
            failover_enabled: false,
            load_balancing: LoadBalancing::default(),
            monitoring: MonitoringThresholds::default(),
        }
    }
}
