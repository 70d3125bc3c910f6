//! Rate limiter types and data structures

use std::time::Instant;

/// Outcome of one admission check
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    /// Whether the request was admitted
    pub allowed: bool,
    /// Request count in the current window, after recording
    pub current_count: u32,
    /// Effective limit (provider quota minus safety buffer)
    pub limit: u32,
    /// Admissions left in the current window
    pub remaining: u32,
    /// Milliseconds until the window resets, set when rejected
    pub retry_after_ms: Option<u64>,
}

/// Per-provider window counter
#[derive(Debug, Clone)]
pub(super) struct WindowCounter {
    /// Requests admitted in the current window
    pub(super) count: u32,
    /// When the current window elapses
    pub(super) reset_at: Instant,
}
