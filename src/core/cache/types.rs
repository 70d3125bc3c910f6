//! Cache key and entry types

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Content-addressed key over provider, endpoint, and parameters
///
/// Parameters are canonicalized (object keys sorted recursively) before
/// hashing, so identical parameters in any insertion order produce the
/// same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a key for a cacheable request
    pub fn build(provider_id: &str, endpoint_id: &str, parameters: &Map<String, Value>) -> Self {
        let canonical = canonicalize(&Value::Object(parameters.clone()));
        let mut hasher = Sha256::new();
        hasher.update(provider_id.as_bytes());
        hasher.update(b"\n");
        hasher.update(endpoint_id.as_bytes());
        hasher.update(b"\n");
        hasher.update(canonical.to_string().as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Hex digest backing this key
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rebuild a JSON value with object keys in sorted order at every level
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<_, _> = map.iter().map(|(k, v)| (k.clone(), canonicalize(v))).collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// One cached payload with its expiry
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached provider payload
    pub payload: Value,
    /// When the entry was stored
    pub stored_at: Instant,
    /// When the entry stops being servable
    pub expires_at: Instant,
}

impl CacheEntry {
    /// Create an entry expiring `ttl` from now
    pub fn new(payload: Value, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            payload,
            stored_at: now,
            expires_at: now + ttl,
        }
    }

    /// Whether the entry may no longer be served
    pub fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}
