//! # apihub
//!
//! A resilient API integration hub: one uniform request contract over many
//! independent third-party HTTP APIs (AI completion, SEO data, analytics,
//! marketing, messaging). Per-provider authentication, rate-limit rules,
//! retry/backoff, caching, and parameter validation all live behind a
//! single `make_request` entry point.
//!
//! ## Features
//!
//! - **Provider registry**: static catalogue of providers and endpoints
//!   with auth type, quota, and per-endpoint cache/retry/timeout policy
//! - **Credential store**: one probe-validated active credential per
//!   provider, atomic replacement
//! - **Rate limiting**: per-provider window counters with a safety buffer,
//!   corrected from provider-surfaced quota headers
//! - **Response caching**: content-addressed, TTL-based, with lazy expiry
//! - **Retrying execution**: per-attempt timeouts and exponential backoff
//! - **Uniform failures**: every outcome is the same response shape;
//!   nothing a provider does can fail the process
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use apihub::{ApiRequest, AuthMaterial, Credential, HubConfig, IntegrationHub};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let hub = IntegrationHub::new(HubConfig::default())?;
//!
//!     hub.set_credentials(Credential::new(
//!         "openai",
//!         AuthMaterial::Bearer { token: "sk-...".into() },
//!     ))
//!     .await?;
//!
//!     let response = hub
//!         .make_request(
//!             ApiRequest::new("openai", "chat-completions")
//!                 .with_param("model", "gpt-4")
//!                 .with_param("messages", serde_json::json!([
//!                     {"role": "user", "content": "Hello"}
//!                 ])),
//!         )
//!         .await;
//!
//!     if response.success {
//!         println!("{}", response.data.unwrap());
//!     } else {
//!         eprintln!("{:?}", response.error.unwrap());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod monitoring;
pub mod utils;

// Re-export the public surface
pub use config::{HubConfig, LoadBalancing, MonitoringThresholds};
pub use core::cache::{CacheKey, ResponseCache};
pub use core::credentials::{AuthMaterial, Credential, CredentialStore};
pub use core::executor::{ExecutionFailure, ExecutionOutcome, RequestExecutor};
pub use core::hub::{HubStats, IntegrationHub};
pub use core::rate_limiter::{RateLimitResult, RateLimiter};
pub use core::registry::{
    AuthType, Endpoint, ParamType, Parameter, Provider, ProviderCategory, ProviderRegistry,
    ProviderStatus, RateLimit,
};
pub use core::types::{
    ApiErrorBody, ApiRequest, ApiResponse, HttpMethod, Priority, ResponseMeta,
};
pub use monitoring::{
    ApiCallRecord, CircuitBreaker, InMemoryMonitor, NoopMonitor, PerformanceMonitor,
    StaticBreaker,
};
pub use utils::error::{HubError, Result, ValidationError};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
