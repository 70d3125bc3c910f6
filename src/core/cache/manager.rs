//! Response cache implementation

use super::types::{CacheEntry, CacheKey};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Cache hit/miss counters, lock-free
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl CacheStats {
    /// Hits since creation or last clear
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Misses since creation or last clear
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Lazy evictions since creation or last clear
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }
}

/// Expiry-based response cache shared across concurrent callers
///
/// Expired entries are evicted lazily on lookup; a concurrent put for the
/// same key is last-writer-wins, which at worst costs a double fetch.
pub struct ResponseCache {
    entries: DashMap<CacheKey, CacheEntry>,
    stats: CacheStats,
}

impl ResponseCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Fetch a payload if present and unexpired; expired entries are
    /// evicted and reported as misses
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = key.as_str(), "cache hit");
                return Some(entry.payload.clone());
            }
            drop(entry);
            self.entries.remove(key);
            self.stats.evictions.fetch_add(1, Ordering::Relaxed);
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a payload with the given TTL
    pub fn put(&self, key: CacheKey, payload: Value, ttl: Duration) {
        debug!(key = key.as_str(), ttl_ms = ttl.as_millis() as u64, "caching response");
        self.entries.insert(key, CacheEntry::new(payload, ttl));
    }

    /// Drop every entry and reset counters
    pub fn clear(&self) {
        self.entries.clear();
        self.stats.hits.store(0, Ordering::Relaxed);
        self.stats.misses.store(0, Ordering::Relaxed);
        self.stats.evictions.store(0, Ordering::Relaxed);
    }

    /// Number of stored entries, expired ones included until next lookup
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit/miss counters
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
