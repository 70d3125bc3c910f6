//! Integration hub orchestrator

use crate::config::HubConfig;
use crate::core::cache::{CacheKey, ResponseCache};
use crate::core::credentials::{Credential, CredentialStore};
use crate::core::executor::RequestExecutor;
use crate::core::rate_limiter::RateLimiter;
use crate::core::registry::{Provider, ProviderCategory, ProviderRegistry};
use crate::core::types::{ApiRequest, ApiResponse, Priority, ResponseMeta};
use crate::core::validator::validate_parameters;
use crate::monitoring::{
    ApiCallRecord, CircuitBreaker, NoopMonitor, PerformanceMonitor, StaticBreaker,
};
use crate::utils::error::{HubError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{info, trace};

/// Snapshot of hub state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubStats {
    /// Registered providers
    pub providers: usize,
    /// Stored credentials
    pub credentials: usize,
    /// Cache entries currently held
    pub cache_entries: usize,
    /// Requests in flight
    pub queue_depth: usize,
}

/// Result of the dispatch pipeline, cache hit or live call
struct Dispatched {
    payload: Value,
    cached: bool,
    retry_count: u32,
    status: u16,
    rate_limit_remaining: Option<u64>,
    rate_limit_reset: Option<u64>,
}

/// Composes registry, credentials, limiter, cache, validator, and executor
/// behind the single `make_request` operation
///
/// Owned by the caller's composition root; there is no ambient global
/// instance.
pub struct IntegrationHub {
    config: HubConfig,
    registry: Arc<ProviderRegistry>,
    credentials: Arc<CredentialStore>,
    rate_limiter: Arc<RateLimiter>,
    cache: Arc<ResponseCache>,
    executor: Arc<RequestExecutor>,
    monitor: Arc<dyn PerformanceMonitor>,
    breaker: Arc<dyn CircuitBreaker>,
    concurrency: Semaphore,
    in_flight: Arc<AtomicUsize>,
}

impl IntegrationHub {
    /// Create a hub with the built-in provider catalog and in-process
    /// collaborator defaults
    pub fn new(config: HubConfig) -> Result<Self> {
        Self::with_collaborators(
            config,
            Arc::new(NoopMonitor),
            Arc::new(StaticBreaker::closed()),
        )
    }

    /// Create a hub wired to external monitor and breaker services
    pub fn with_collaborators(
        config: HubConfig,
        monitor: Arc<dyn PerformanceMonitor>,
        breaker: Arc<dyn CircuitBreaker>,
    ) -> Result<Self> {
        info!(
            retry_attempts = config.retry_attempts,
            cache_enabled = config.cache_enabled,
            buffer_percent = config.rate_limit_buffer_percent,
            "initializing integration hub"
        );
        let executor = Arc::new(RequestExecutor::new(&config)?);
        Ok(Self {
            rate_limiter: Arc::new(RateLimiter::new(config.rate_limit_buffer_percent)),
            registry: Arc::new(ProviderRegistry::with_defaults()),
            credentials: Arc::new(CredentialStore::new()),
            cache: Arc::new(ResponseCache::new()),
            executor,
            monitor,
            breaker,
            concurrency: Semaphore::new(config.max_concurrent_requests),
            in_flight: Arc::new(AtomicUsize::new(0)),
            config,
        })
    }

    /// Execute one request through the full pipeline
    ///
    /// Never returns an error: every failure mode is normalized into a
    /// `success: false` response with a structured error body. One monitor
    /// record is emitted per call, success or not. At most
    /// `max_concurrent_requests` requests run the pipeline at once; excess
    /// callers wait rather than being rejected.
    pub async fn make_request(&self, request: ApiRequest) -> ApiResponse {
        let started = Instant::now();
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        // The semaphore is never closed, so acquisition only ever waits.
        let permit = self.concurrency.acquire().await.ok();
        let result = self.dispatch(&request).await;
        drop(permit);
        self.in_flight.fetch_sub(1, Ordering::Relaxed);

        let duration_ms = started.elapsed().as_millis() as u64;
        let (response, method, status, success) = match result {
            Ok(dispatched) => {
                let meta = ResponseMeta {
                    duration_ms,
                    cached: dispatched.cached,
                    retry_count: dispatched.retry_count,
                    timestamp: Utc::now(),
                    rate_limit_remaining: dispatched.rate_limit_remaining,
                    rate_limit_reset: dispatched.rate_limit_reset,
                };
                let method = self.method_name(&request);
                let status = dispatched.status;
                (ApiResponse::ok(dispatched.payload, meta), method, status, true)
            }
            Err(err) => {
                let meta = ResponseMeta::new(duration_ms, false, err.retry_count());
                let method = self.method_name(&request);
                let status = match &err {
                    HubError::Provider { status, .. } => *status,
                    _ => 0,
                };
                (ApiResponse::from_error(&err, meta), method, status, false)
            }
        };

        // Fire-and-forget: monitor outcomes never affect the response.
        self.monitor
            .track_api_call(ApiCallRecord {
                endpoint: request.endpoint_id.clone(),
                method,
                duration_ms,
                status,
                success,
                timestamp: Utc::now(),
            })
            .await;

        response
    }

    /// The full pipeline for one request
    async fn dispatch(&self, request: &ApiRequest) -> Result<Dispatched> {
        let provider = self
            .registry
            .get(&request.provider_id)
            .ok_or_else(|| HubError::ProviderNotFound(request.provider_id.clone()))?;
        let endpoint = provider
            .endpoint(&request.endpoint_id)
            .ok_or_else(|| HubError::EndpointNotFound {
                provider: request.provider_id.clone(),
                endpoint: request.endpoint_id.clone(),
            })?;

        // Cache hits short-circuit before validation and never consume a
        // rate-limit slot.
        let cache_key = (self.config.cache_enabled && endpoint.cacheable)
            .then(|| CacheKey::build(&provider.id, &endpoint.id, &request.parameters));
        if let Some(key) = &cache_key {
            if let Some(payload) = self.cache.get(key) {
                return Ok(Dispatched {
                    payload,
                    cached: true,
                    retry_count: 0,
                    status: 200,
                    rate_limit_remaining: None,
                    rate_limit_reset: None,
                });
            }
        }

        // Validation precedes credential lookup, quota consumption, and all
        // network I/O; an invalid call costs nothing.
        validate_parameters(endpoint, &request.parameters)?;

        let credential = self.credentials.get_active(&provider.id).ok_or_else(|| {
            HubError::Credential(format!(
                "no active credential for provider `{}`",
                provider.id
            ))
        })?;

        if !self.breaker.allow(&provider.id).await {
            return Err(HubError::CircuitOpen(provider.id.clone()));
        }

        let admission = self
            .rate_limiter
            .check_and_record(&provider.id, &provider.rate_limit)
            .await;
        if !admission.allowed {
            return Err(HubError::RateLimitExceeded {
                retry_after_ms: admission.retry_after_ms.unwrap_or_default(),
            });
        }

        match self
            .executor
            .execute(&provider, endpoint, request, &credential)
            .await
        {
            Ok(outcome) => {
                // Provider truth overrides the local quota estimate, on
                // rejections as much as on successes.
                self.rate_limiter
                    .apply_provider_hint(
                        &provider.id,
                        &provider.rate_limit,
                        outcome.rate_limit_remaining,
                        outcome.rate_limit_reset,
                    )
                    .await;
                self.breaker.record_success(&provider.id).await;

                if let Some(key) = cache_key {
                    let ttl = Duration::from_millis(
                        endpoint.cache_ttl_ms.unwrap_or(self.config.cache_ttl_ms),
                    );
                    self.cache.put(key, outcome.payload.clone(), ttl);
                }

                Ok(Dispatched {
                    payload: outcome.payload,
                    cached: false,
                    retry_count: outcome.retry_count,
                    status: outcome.status,
                    rate_limit_remaining: outcome.rate_limit_remaining,
                    rate_limit_reset: outcome.rate_limit_reset,
                })
            }
            Err(failure) => {
                self.rate_limiter
                    .apply_provider_hint(
                        &provider.id,
                        &provider.rate_limit,
                        failure.rate_limit_remaining,
                        failure.rate_limit_reset,
                    )
                    .await;
                self.breaker.record_failure(&provider.id).await;
                Err(failure.error)
            }
        }
    }

    fn method_name(&self, request: &ApiRequest) -> String {
        self.registry
            .get(&request.provider_id)
            .and_then(|p| p.endpoint(&request.endpoint_id).map(|e| e.method.to_string()))
            .unwrap_or_else(|| "UNKNOWN".to_string())
    }

    /// Register or overwrite a provider definition
    pub fn register_provider(&self, provider: Provider) {
        self.registry.register(provider);
    }

    /// Providers, optionally filtered by category
    pub fn get_providers(&self, category: Option<ProviderCategory>) -> Vec<Arc<Provider>> {
        self.registry.list(category)
    }

    /// Validate and store a credential for its provider
    ///
    /// The material must match the provider's declared auth scheme. When
    /// the provider designates a test endpoint, the credential must also
    /// pass a probe call against it before the swap; a rejected credential
    /// leaves any prior one in place.
    pub async fn set_credentials(&self, credential: Credential) -> Result<()> {
        let provider = self
            .registry
            .get(&credential.provider_id)
            .ok_or_else(|| HubError::ProviderNotFound(credential.provider_id.clone()))?;

        let offered = credential.material.auth_type();
        if offered != provider.auth_type {
            return Err(HubError::Credential(format!(
                "provider `{}` expects {:?} credentials, got {:?}",
                provider.id, provider.auth_type, offered
            )));
        }

        if let Some(probe) = provider.probe_endpoint() {
            let request = ApiRequest::new(&provider.id, &probe.id)
                .with_priority(Priority::Low)
                .with_retries(0);
            self.executor
                .execute(&provider, probe, &request, &credential)
                .await
                .map_err(|failure| {
                    HubError::Credential(format!("credential probe failed: {}", failure.error))
                })?;
        }

        self.credentials.insert(credential);
        Ok(())
    }

    /// Probe a provider's test endpoint with the stored credential
    ///
    /// False when the provider is unknown, designates no test endpoint, or
    /// the probe fails for any reason.
    pub async fn test_connection(&self, provider_id: &str) -> bool {
        let Some(provider) = self.registry.get(provider_id) else {
            return false;
        };
        let Some(endpoint_id) = provider.test_endpoint.clone() else {
            return false;
        };
        let request = ApiRequest::new(provider_id, endpoint_id)
            .with_priority(Priority::Low)
            .with_retries(0);
        self.make_request(request).await.success
    }

    /// Drop every cached response
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Snapshot of hub state
    pub fn get_stats(&self) -> HubStats {
        HubStats {
            providers: self.registry.len(),
            credentials: self.credentials.len(),
            cache_entries: self.cache.len(),
            queue_depth: self.in_flight.load(Ordering::Relaxed),
        }
    }

    /// Total outbound HTTP attempts performed, for diagnostics
    pub fn network_calls(&self) -> u64 {
        self.executor.network_calls()
    }

    /// Spawn the background queue-drain tick
    ///
    /// Reserved for future prioritization; the tick does no blocking work
    /// today. Dropping the returned handle aborts nothing; abort it to stop
    /// the tick.
    pub fn start_queue_drain(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let hub = Arc::clone(self);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_secs(1));
            loop {
                tick.tick().await;
                trace!(
                    in_flight = hub.in_flight.load(Ordering::Relaxed),
                    "queue drain tick"
                );
            }
        })
    }
}
