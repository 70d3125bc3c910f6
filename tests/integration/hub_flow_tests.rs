//! End-to-end request flows through the hub

use crate::common::{fast_config, hub_for, search_request};
use apihub::{ApiRequest, HubConfig, InMemoryMonitor, IntegrationHub, StaticBreaker};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_get_flow_sends_query_and_auth_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("query", "rust"))
        .and(header("X-Api-Key", "secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [1, 2]})))
        .expect(1)
        .mount(&server)
        .await;

    let hub = hub_for(&server, 100, 60_000, fast_config()).await;
    let response = hub.make_request(search_request("rust")).await;

    assert!(response.success, "{:?}", response.error);
    assert_eq!(response.data.unwrap()["results"], json!([1, 2]));
    assert!(!response.meta.cached);
    assert_eq!(response.meta.retry_count, 0);
}

#[tokio::test]
async fn test_post_flow_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/items"))
        .and(body_json(json!({"name": "widget"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let hub = hub_for(&server, 100, 60_000, fast_config()).await;
    let response = hub
        .make_request(ApiRequest::new("acme", "create").with_param("name", "widget"))
        .await;

    assert!(response.success, "{:?}", response.error);
    assert_eq!(response.data.unwrap()["id"], 7);
}

#[tokio::test]
async fn test_provider_error_is_structured_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/quote"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let hub = hub_for(&server, 100, 60_000, fast_config()).await;
    let response = hub
        .make_request(ApiRequest::new("acme", "quote").with_param("price", 10))
        .await;

    assert!(!response.success);
    let error = response.error.unwrap();
    assert_eq!(error.code, "PROVIDER_ERROR");
    assert_eq!(error.details.unwrap()["status"], 500);
}

#[tokio::test]
async fn test_rate_limit_hints_echoed_in_meta() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .insert_header("X-RateLimit-Remaining", "7")
                .insert_header("X-RateLimit-Reset", "1700000000"),
        )
        .mount(&server)
        .await;

    let hub = hub_for(&server, 100, 60_000, fast_config()).await;
    let response = hub.make_request(search_request("rust")).await;

    assert!(response.success);
    assert_eq!(response.meta.rate_limit_remaining, Some(7));
    assert_eq!(response.meta.rate_limit_reset, Some(1_700_000_000));
}

#[tokio::test]
async fn test_malformed_json_body_is_serialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/quote"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let hub = hub_for(&server, 100, 60_000, fast_config()).await;
    let response = hub
        .make_request(ApiRequest::new("acme", "quote").with_param("price", 1))
        .await;

    assert!(!response.success);
    assert_eq!(response.error.unwrap().code, "SERIALIZATION_ERROR");
}

#[tokio::test]
async fn test_empty_body_tolerated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ping"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let hub = hub_for(&server, 100, 60_000, fast_config()).await;
    let response = hub.make_request(ApiRequest::new("acme", "ping")).await;

    assert!(response.success, "{:?}", response.error);
    assert_eq!(response.data.unwrap(), serde_json::Value::Null);
}

#[tokio::test]
async fn test_monitor_receives_one_record_per_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let monitor = Arc::new(InMemoryMonitor::new());
    let hub = IntegrationHub::with_collaborators(
        fast_config(),
        monitor.clone(),
        Arc::new(StaticBreaker::closed()),
    )
    .unwrap();
    hub.register_provider(crate::common::provider(&server.uri(), 100, 60_000, 500));
    hub.set_credentials(crate::common::api_key_credential())
        .await
        .unwrap();

    // Live call, then a cache hit; both are recorded.
    hub.make_request(search_request("rust")).await;
    hub.make_request(search_request("rust")).await;

    let records = monitor.records();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.success));
    assert!(records.iter().all(|r| r.endpoint == "search"));
    assert!(records.iter().all(|r| r.method == "GET"));
    assert_eq!(records[0].status, 200);
}

#[tokio::test]
async fn test_stats_and_queue_depth_settle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let hub = hub_for(&server, 100, 60_000, fast_config()).await;
    hub.make_request(search_request("rust")).await;

    let stats = hub.get_stats();
    assert_eq!(stats.credentials, 1);
    assert_eq!(stats.cache_entries, 1);
    assert_eq!(stats.queue_depth, 0);
}

#[tokio::test]
async fn test_concurrent_fan_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(20)
        .mount(&server)
        .await;

    let hub = Arc::new(hub_for(&server, 100, 60_000, fast_config()).await);

    let mut handles = Vec::new();
    for _ in 0..20 {
        let hub = hub.clone();
        handles.push(tokio::spawn(async move {
            hub.make_request(ApiRequest::new("acme", "flaky")).await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().success);
    }
    assert_eq!(hub.get_stats().queue_depth, 0);
}

#[tokio::test]
async fn test_concurrency_bound_queues_excess_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/flaky"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(std::time::Duration::from_millis(100)),
        )
        .expect(6)
        .mount(&server)
        .await;

    let mut config = fast_config();
    config.max_concurrent_requests = 2;
    let hub = Arc::new(hub_for(&server, 100, 60_000, config).await);

    let started = std::time::Instant::now();
    let mut handles = Vec::new();
    for _ in 0..6 {
        let hub = hub.clone();
        handles.push(tokio::spawn(async move {
            hub.make_request(ApiRequest::new("acme", "flaky")).await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().success);
    }

    // Six 100ms calls two at a time take at least three rounds.
    assert!(started.elapsed() >= std::time::Duration::from_millis(300));
}

#[tokio::test]
async fn test_failure_response_same_shape_as_success() {
    let hub = IntegrationHub::new(HubConfig::default()).unwrap();
    let response = hub.make_request(ApiRequest::new("ghost", "none")).await;

    // Same envelope either way: meta always present, error body structured.
    assert!(!response.success);
    assert!(response.data.is_none());
    let error = response.error.unwrap();
    assert!(!error.code.is_empty());
    assert!(!error.message.is_empty());
}
