//! Retrying HTTP executor

use crate::config::HubConfig;
use crate::core::credentials::Credential;
use crate::core::registry::{Endpoint, Provider};
use crate::core::types::ApiRequest;
use crate::utils::error::{HubError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder, StatusCode};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

const ERROR_BODY_LIMIT: usize = 512;

/// Result of a successful execution, retries included
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    /// Parsed provider payload
    pub payload: Value,
    /// HTTP status of the final attempt
    pub status: u16,
    /// Retries performed beyond the first attempt
    pub retry_count: u32,
    /// Remaining quota surfaced by the provider, when present
    pub rate_limit_remaining: Option<u64>,
    /// Quota reset hint surfaced by the provider (Unix seconds)
    pub rate_limit_reset: Option<u64>,
}

/// A failed execution, carrying any quota hints the provider surfaced on
/// the final response
///
/// Rejections are exactly where the provider's own counters are most
/// authoritative (a 429 with `Remaining: 0`), so hints survive the error
/// path for the limiter to consume.
#[derive(Debug)]
pub struct ExecutionFailure {
    /// What went wrong
    pub error: HubError,
    /// Remaining quota surfaced by the provider, when present
    pub rate_limit_remaining: Option<u64>,
    /// Quota reset hint surfaced by the provider (Unix seconds)
    pub rate_limit_reset: Option<u64>,
}

impl From<HubError> for ExecutionFailure {
    fn from(error: HubError) -> Self {
        Self {
            error,
            rate_limit_remaining: None,
            rate_limit_reset: None,
        }
    }
}

/// Builds and performs outbound calls with timeout and backoff
pub struct RequestExecutor {
    client: Client,
    default_timeout: Duration,
    default_retries: u32,
    retry_delay: Duration,
    network_calls: AtomicU64,
}

impl RequestExecutor {
    /// Create an executor from hub configuration
    pub fn new(config: &HubConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| HubError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            default_timeout: Duration::from_millis(config.default_timeout_ms),
            default_retries: config.retry_attempts,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            network_calls: AtomicU64::new(0),
        })
    }

    /// Execute a request against a provider endpoint
    ///
    /// Failed attempts are retried with exponential backoff while the
    /// endpoint is retryable and budget remains; each attempt gets a fresh
    /// timeout. Exhausting the budget surfaces as `MaxRetriesExceeded`;
    /// non-retryable failures propagate as-is. Quota hints from the final
    /// attempt ride along on both outcomes.
    pub async fn execute(
        &self,
        provider: &Provider,
        endpoint: &Endpoint,
        request: &ApiRequest,
        credential: &Credential,
    ) -> Result<ExecutionOutcome, ExecutionFailure> {
        let retries = if endpoint.retryable {
            request.retries.unwrap_or(self.default_retries)
        } else {
            0
        };

        let mut attempt = 1u32;
        loop {
            match self.attempt(provider, endpoint, request, credential).await {
                Ok(mut outcome) => {
                    outcome.retry_count = attempt - 1;
                    return Ok(outcome);
                }
                Err(failure) if attempt > retries => {
                    let error = if retries > 0 {
                        HubError::MaxRetriesExceeded {
                            attempts: retries,
                            last: failure.error.to_string(),
                        }
                    } else {
                        failure.error
                    };
                    return Err(ExecutionFailure {
                        error,
                        rate_limit_remaining: failure.rate_limit_remaining,
                        rate_limit_reset: failure.rate_limit_reset,
                    });
                }
                Err(failure) => {
                    let delay = backoff_delay(self.retry_delay, attempt);
                    warn!(
                        provider = %provider.id,
                        endpoint = %endpoint.id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %failure.error,
                        "attempt failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// One outbound attempt with its own timeout budget
    async fn attempt(
        &self,
        provider: &Provider,
        endpoint: &Endpoint,
        request: &ApiRequest,
        credential: &Credential,
    ) -> Result<ExecutionOutcome, ExecutionFailure> {
        self.network_calls.fetch_add(1, Ordering::Relaxed);

        let url = build_url(&provider.base_url, &endpoint.path);
        let attempt_timeout = Duration::from_millis(
            request
                .timeout_ms
                .or(endpoint.timeout_ms)
                .unwrap_or(self.default_timeout.as_millis() as u64),
        );

        let mut headers = credential.material.build_auth_headers()?;
        merge_request_headers(&mut headers, request)?;

        let mut builder = self
            .client
            .request(endpoint.method.into(), &url)
            .headers(headers);

        if endpoint.method.has_body() {
            builder = builder.json(&request.parameters);
        } else if !request.parameters.is_empty() {
            builder = builder.query(&query_pairs(&request.parameters));
        }

        debug!(method = %endpoint.method, url = %url, "sending request");

        // One deadline covers the whole exchange; `send` resolving at the
        // headers must not leave the body read unbounded.
        let (status, hints, body) = timeout(attempt_timeout, async {
            let response = builder
                .send()
                .await
                .map_err(|e| HubError::Transport(format!("network error: {e}")))?;
            let status = response.status();
            let hints = rate_limit_hints(response.headers());
            let body = response
                .text()
                .await
                .map_err(|e| HubError::Transport(format!("failed to read response body: {e}")))?;
            Ok::<_, HubError>((status, hints, body))
        })
        .await
        .map_err(|_| {
            HubError::Transport(format!(
                "request timed out after {}ms",
                attempt_timeout.as_millis()
            ))
        })??;

        let (rate_limit_remaining, rate_limit_reset) = hints;

        if !status.is_success() {
            return Err(ExecutionFailure {
                error: provider_error(status, &body),
                rate_limit_remaining,
                rate_limit_reset,
            });
        }

        let payload = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).map_err(HubError::Serialization)?
        };

        Ok(ExecutionOutcome {
            payload,
            status: status.as_u16(),
            retry_count: 0,
            rate_limit_remaining,
            rate_limit_reset,
        })
    }

    /// Total outbound attempts performed, across all requests
    pub fn network_calls(&self) -> u64 {
        self.network_calls.load(Ordering::Relaxed)
    }
}

/// Backoff before retrying the given failed attempt (counted from 1)
pub(super) fn backoff_delay(retry_delay: Duration, attempt: u32) -> Duration {
    retry_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
}

/// Join a base URL and an endpoint path with exactly one slash
pub(super) fn build_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Flatten JSON parameters into query pairs; strings stay raw, other
/// values keep their JSON form
pub(super) fn query_pairs(parameters: &serde_json::Map<String, Value>) -> Vec<(String, String)> {
    parameters
        .iter()
        .map(|(name, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (name.clone(), rendered)
        })
        .collect()
}

/// Read provider quota hints; absent headers are simply no hint
pub(super) fn rate_limit_hints(headers: &HeaderMap) -> (Option<u64>, Option<u64>) {
    let parse = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
    };
    (parse("x-ratelimit-remaining"), parse("x-ratelimit-reset"))
}

fn merge_request_headers(headers: &mut HeaderMap, request: &ApiRequest) -> Result<()> {
    for (name, value) in &request.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| HubError::Config(format!("invalid request header `{name}`: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| HubError::Config(format!("invalid request header value: {e}")))?;
        headers.insert(name, value);
    }
    Ok(())
}

fn provider_error(status: StatusCode, body: &str) -> HubError {
    let body: String = body.trim().chars().take(ERROR_BODY_LIMIT).collect();
    HubError::Provider {
        status: status.as_u16(),
        body,
    }
}
