//! Collaborator seams: performance monitor and circuit breaker
//!
//! Both services live outside the hub; the hub only feeds the monitor
//! (fire-and-forget) and consults the breaker before dispatching to a
//! provider. In-process defaults keep the hub usable without either.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// One observed API call, as handed to the performance monitor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCallRecord {
    /// Endpoint id that was called
    pub endpoint: String,
    /// HTTP method name
    pub method: String,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
    /// HTTP status of the final attempt; 0 when no attempt reached a provider
    pub status: u16,
    /// Whether the call succeeded
    pub success: bool,
    /// When the call completed
    pub timestamp: DateTime<Utc>,
}

/// Sink for per-call performance records
///
/// Implementations must never fail the request; the hub does not look at
/// any outcome of `track_api_call`.
#[async_trait]
pub trait PerformanceMonitor: Send + Sync {
    /// Record one completed call, fire-and-forget
    async fn track_api_call(&self, record: ApiCallRecord);
}

/// Tracks provider health independently of the hub's retry logic
#[async_trait]
pub trait CircuitBreaker: Send + Sync {
    /// Whether calls to this provider should currently be dispatched
    async fn allow(&self, provider_id: &str) -> bool;
    /// Feed a successful call outcome
    async fn record_success(&self, provider_id: &str);
    /// Feed a failed call outcome
    async fn record_failure(&self, provider_id: &str);
}

/// Monitor that discards every record
#[derive(Debug, Default)]
pub struct NoopMonitor;

#[async_trait]
impl PerformanceMonitor for NoopMonitor {
    async fn track_api_call(&self, _record: ApiCallRecord) {}
}

/// Monitor that keeps records in memory, for tests and diagnostics
#[derive(Debug, Default)]
pub struct InMemoryMonitor {
    records: RwLock<Vec<ApiCallRecord>>,
}

impl InMemoryMonitor {
    /// Create an empty monitor
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn records(&self) -> Vec<ApiCallRecord> {
        self.records.read().clone()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl PerformanceMonitor for InMemoryMonitor {
    async fn track_api_call(&self, record: ApiCallRecord) {
        self.records.write().push(record);
    }
}

/// Breaker that always answers the same, for tests and as the default
#[derive(Debug)]
pub struct StaticBreaker {
    closed: bool,
}

impl StaticBreaker {
    /// Breaker that lets every call through
    pub fn closed() -> Self {
        Self { closed: true }
    }

    /// Breaker that refuses every call
    pub fn open() -> Self {
        Self { closed: false }
    }
}

#[async_trait]
impl CircuitBreaker for StaticBreaker {
    async fn allow(&self, _provider_id: &str) -> bool {
        self.closed
    }

    async fn record_success(&self, _provider_id: &str) {}

    async fn record_failure(&self, _provider_id: &str) {}
}
