//! Core rate limiter implementation

use super::types::{RateLimitResult, WindowCounter};
use crate::core::registry::RateLimit;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use tracing::debug;

/// Per-provider fixed-window rate limiter with a safety buffer
///
/// The buffer keeps the local estimate a margin below the provider's
/// advertised quota, so estimation drift never makes the provider's own
/// limiter reject a call the hub admitted.
pub struct RateLimiter {
    /// Percent of each provider's quota withheld as safety margin
    buffer_percent: u8,
    /// Window counters by provider id
    counters: Arc<RwLock<HashMap<String, WindowCounter>>>,
}

impl RateLimiter {
    /// Create a rate limiter with the given buffer percentage
    pub fn new(buffer_percent: u8) -> Self {
        Self {
            buffer_percent: buffer_percent.min(100),
            counters: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Quota minus the safety buffer, floored
    fn effective_limit(&self, limit: &RateLimit) -> u32 {
        let factor = 1.0 - f64::from(self.buffer_percent) / 100.0;
        (f64::from(limit.requests_allowed) * factor).floor() as u32
    }

    /// Atomically check and record one admission for a provider
    ///
    /// Check and record happen under a single write-lock acquisition so two
    /// concurrent admissions cannot both read the old count and over-admit
    /// the window.
    pub async fn check_and_record(&self, provider_id: &str, limit: &RateLimit) -> RateLimitResult {
        let now = Instant::now();
        let window = Duration::from_millis(limit.window_ms);
        let effective = self.effective_limit(limit);

        let mut counters = self.counters.write().await;
        let counter = counters
            .entry(provider_id.to_string())
            .or_insert_with(|| WindowCounter {
                count: 0,
                reset_at: now + window,
            });

        // Elapsed window: restart the counter before admitting.
        if now > counter.reset_at {
            counter.count = 0;
            counter.reset_at = now + window;
        }

        if counter.count < effective {
            counter.count += 1;
            admitted(counter.count, effective)
        } else {
            let retry_after_ms = counter
                .reset_at
                .saturating_duration_since(now)
                .as_millis() as u64;
            debug!(
                provider = provider_id,
                count = counter.count,
                limit = effective,
                retry_after_ms,
                "rate limit exceeded"
            );
            RateLimitResult {
                allowed: false,
                current_count: counter.count,
                limit: effective,
                remaining: 0,
                retry_after_ms: Some(retry_after_ms),
            }
        }
    }

    /// Correct the local counter from provider-surfaced quota headers
    ///
    /// Provider truth overrides the local estimate so drift never compounds
    /// across windows. `reset_epoch_secs` is the provider's reset timestamp
    /// in Unix seconds, as carried by `X-RateLimit-Reset`.
    pub async fn apply_provider_hint(
        &self,
        provider_id: &str,
        limit: &RateLimit,
        remaining: Option<u64>,
        reset_epoch_secs: Option<u64>,
    ) {
        if remaining.is_none() && reset_epoch_secs.is_none() {
            return;
        }

        let now = Instant::now();
        let mut counters = self.counters.write().await;
        let counter = counters
            .entry(provider_id.to_string())
            .or_insert_with(|| WindowCounter {
                count: 0,
                reset_at: now + Duration::from_millis(limit.window_ms),
            });

        if let Some(remaining) = remaining {
            let provider_count =
                u64::from(limit.requests_allowed).saturating_sub(remaining) as u32;
            if provider_count != counter.count {
                debug!(
                    provider = provider_id,
                    local = counter.count,
                    corrected = provider_count,
                    "correcting window counter from provider headers"
                );
                counter.count = provider_count;
            }
        }

        if let Some(reset_epoch) = reset_epoch_secs {
            let unix_now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs();
            let until_reset = Duration::from_secs(reset_epoch.saturating_sub(unix_now));
            counter.reset_at = now + until_reset;
        }
    }

    /// Drop counters whose window has elapsed
    pub async fn cleanup(&self) {
        let now = Instant::now();
        self.counters
            .write()
            .await
            .retain(|_, counter| now <= counter.reset_at);
    }

    /// Snapshot of a provider's current window count, for introspection
    pub async fn current_count(&self, provider_id: &str) -> u32 {
        self.counters
            .read()
            .await
            .get(provider_id)
            .map_or(0, |c| c.count)
    }
}

fn admitted(count: u32, effective: u32) -> RateLimitResult {
    RateLimitResult {
        allowed: true,
        current_count: count,
        limit: effective,
        remaining: effective.saturating_sub(count),
        retry_after_ms: None,
    }
}
