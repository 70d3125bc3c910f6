//! Rate limiting
//!
//! Per-provider fixed-window admission with a configurable safety buffer
//! below each provider's advertised quota.

mod limiter;
mod types;


pub use limiter::RateLimiter;
pub use types::RateLimitResult;
