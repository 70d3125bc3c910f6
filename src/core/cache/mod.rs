//! Response caching
//!
//! Content-addressed, expiry-based store for cacheable endpoint responses.

mod manager;
mod types;


pub use manager::{CacheStats, ResponseCache};
pub use types::{CacheEntry, CacheKey};
