//! Retry and backoff behavior through the full pipeline

use crate::common::{fast_config, hub_for};
use apihub::ApiRequest;
use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_exhausted_retries_surface_with_backoff_schedule() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/flaky"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(4)
        .mount(&server)
        .await;

    // retry_delay=100ms, 3 retries: inter-attempt delays 100, 200, 400ms.
    let hub = hub_for(&server, 100, 60_000, fast_config()).await;

    let started = Instant::now();
    let response = hub
        .make_request(ApiRequest::new("acme", "flaky").with_retries(3))
        .await;
    let elapsed = started.elapsed();

    assert!(!response.success);
    assert_eq!(response.meta.retry_count, 3);

    let error = response.error.unwrap();
    assert_eq!(error.code, "MAX_RETRIES_EXCEEDED");
    assert_eq!(error.details.unwrap()["retries"], 3);

    assert!(
        elapsed >= Duration::from_millis(700),
        "expected at least 100+200+400ms of backoff, got {elapsed:?}"
    );
    assert!(elapsed < Duration::from_secs(5));
}

#[tokio::test]
async fn test_recovers_after_transient_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let hub = hub_for(&server, 100, 60_000, fast_config()).await;
    let response = hub.make_request(ApiRequest::new("acme", "flaky")).await;

    assert!(response.success, "{:?}", response.error);
    assert_eq!(response.meta.retry_count, 2);
}

#[tokio::test]
async fn test_non_retryable_endpoint_fails_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/quote"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let hub = hub_for(&server, 100, 60_000, fast_config()).await;
    let response = hub
        .make_request(ApiRequest::new("acme", "quote").with_param("price", 1))
        .await;

    assert!(!response.success);
    // Propagated as-is, not wrapped in a retry exhaustion error.
    assert_eq!(response.error.unwrap().code, "PROVIDER_ERROR");
    assert_eq!(response.meta.retry_count, 0);
}

#[tokio::test]
async fn test_zero_retry_budget_propagates_raw_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let hub = hub_for(&server, 100, 60_000, fast_config()).await;
    let response = hub
        .make_request(ApiRequest::new("acme", "flaky").with_retries(0))
        .await;

    assert!(!response.success);
    assert_eq!(response.error.unwrap().code, "PROVIDER_ERROR");
}

#[tokio::test]
async fn test_slow_provider_times_out_as_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/quote"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;

    let hub = hub_for(&server, 100, 60_000, fast_config()).await;
    let response = hub
        .make_request(
            ApiRequest::new("acme", "quote")
                .with_param("price", 1)
                .with_timeout_ms(100),
        )
        .await;

    assert!(!response.success);
    assert_eq!(response.error.unwrap().code, "TRANSPORT_ERROR");
}

#[tokio::test]
async fn test_stalled_body_read_hits_attempt_deadline() {
    use crate::common::{api_key_credential, provider};
    use apihub::IntegrationHub;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    // Headers arrive promptly, then the promised body never finishes; the
    // attempt deadline must cover the read, not just the send.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 64\r\n\r\n{\"partial")
                    .await;
                tokio::time::sleep(Duration::from_secs(30)).await;
            });
        }
    });

    let hub = IntegrationHub::new(fast_config()).unwrap();
    hub.register_provider(provider(&format!("http://{addr}"), 100, 60_000, 500));
    hub.set_credentials(api_key_credential()).await.unwrap();

    let started = Instant::now();
    let response = hub
        .make_request(
            ApiRequest::new("acme", "quote")
                .with_param("price", 1)
                .with_timeout_ms(200),
        )
        .await;

    assert!(!response.success);
    assert_eq!(response.error.unwrap().code, "TRANSPORT_ERROR");
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_each_attempt_gets_fresh_timeout_budget() {
    let server = MockServer::start().await;
    // Every attempt takes 150ms; a 250ms per-attempt budget fails only if
    // it were shared across the retry sequence.
    Mock::given(method("GET"))
        .and(path("/v1/flaky"))
        .respond_with(ResponseTemplate::new(503).set_delay(Duration::from_millis(150)))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/flaky"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true}))
                .set_delay(Duration::from_millis(150)),
        )
        .mount(&server)
        .await;

    let hub = hub_for(&server, 100, 60_000, fast_config()).await;
    let response = hub
        .make_request(
            ApiRequest::new("acme", "flaky")
                .with_timeout_ms(250)
                .with_retries(2),
        )
        .await;

    assert!(response.success, "{:?}", response.error);
    assert_eq!(response.meta.retry_count, 2);
}
