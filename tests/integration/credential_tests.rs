//! Credential storage, probing, and auth header injection

use crate::common::{api_key_credential, fast_config, provider_with_probe, search_request};
use apihub::{AuthMaterial, AuthType, Credential, HubError, IntegrationHub};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_ping(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/v1/ping"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_probe_success_stores_credential() {
    let server = MockServer::start().await;
    mount_ping(&server, 200).await;

    let hub = IntegrationHub::new(fast_config()).unwrap();
    hub.register_provider(provider_with_probe(&server.uri()));

    hub.set_credentials(api_key_credential()).await.unwrap();
    assert_eq!(hub.get_stats().credentials, 1);
}

#[tokio::test]
async fn test_probe_failure_keeps_previous_credential() {
    let server = MockServer::start().await;
    // The probe only passes with the original key.
    Mock::given(method("GET"))
        .and(path("/v1/ping"))
        .and(header("X-Api-Key", "secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/ping"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(header("X-Api-Key", "secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let hub = IntegrationHub::new(fast_config()).unwrap();
    hub.register_provider(provider_with_probe(&server.uri()));
    hub.set_credentials(api_key_credential()).await.unwrap();

    let rotated = Credential::new(
        "acme",
        AuthMaterial::ApiKey {
            key: "revoked-key".into(),
            header_name: Some("X-Api-Key".into()),
        },
    );
    let err = hub.set_credentials(rotated).await.unwrap_err();
    assert!(matches!(err, HubError::Credential(_)));

    // The rejected rotation left the working credential in place.
    assert_eq!(hub.get_stats().credentials, 1);
    let response = hub.make_request(search_request("rust")).await;
    assert!(response.success, "{:?}", response.error);
}

#[tokio::test]
async fn test_bearer_material_sends_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(header("Authorization", "Bearer tok-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let hub = IntegrationHub::new(fast_config()).unwrap();
    let mut acme = crate::common::provider(&server.uri(), 100, 60_000, 500);
    acme.auth_type = AuthType::Bearer;
    hub.register_provider(acme);
    hub.set_credentials(Credential::new(
        "acme",
        AuthMaterial::Bearer {
            token: "tok-42".into(),
        },
    ))
    .await
    .unwrap();

    assert!(hub.make_request(search_request("rust")).await.success);
}

#[tokio::test]
async fn test_basic_material_sends_encoded_pair() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let hub = IntegrationHub::new(fast_config()).unwrap();
    let mut acme = crate::common::provider(&server.uri(), 100, 60_000, 500);
    acme.auth_type = AuthType::Basic;
    hub.register_provider(acme);
    hub.set_credentials(Credential::new(
        "acme",
        AuthMaterial::Basic {
            username: "user".into(),
            password: "pass".into(),
        },
    ))
    .await
    .unwrap();

    assert!(hub.make_request(search_request("rust")).await.success);
}

#[tokio::test]
async fn test_material_kind_must_match_provider_auth_type() {
    let server = MockServer::start().await;

    let hub = IntegrationHub::new(fast_config()).unwrap();
    // The fixture provider declares api-key auth.
    hub.register_provider(crate::common::provider(&server.uri(), 100, 60_000, 500));

    let err = hub
        .set_credentials(Credential::new(
            "acme",
            AuthMaterial::Bearer { token: "t".into() },
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, HubError::Credential(_)));
    assert_eq!(hub.get_stats().credentials, 0);
    assert_eq!(hub.network_calls(), 0, "mismatch is rejected before any probe");
}

#[tokio::test]
async fn test_missing_credential_is_structured_failure() {
    let server = MockServer::start().await;

    let hub = IntegrationHub::new(fast_config()).unwrap();
    hub.register_provider(crate::common::provider(&server.uri(), 100, 60_000, 500));

    let response = hub.make_request(search_request("rust")).await;
    assert!(!response.success);
    assert_eq!(response.error.unwrap().code, "CREDENTIAL_ERROR");
    assert_eq!(hub.network_calls(), 0);
}

#[tokio::test]
async fn test_test_connection_round_trip() {
    let server = MockServer::start().await;
    mount_ping(&server, 200).await;

    let hub = IntegrationHub::new(fast_config()).unwrap();
    hub.register_provider(provider_with_probe(&server.uri()));
    hub.set_credentials(api_key_credential()).await.unwrap();

    assert!(hub.test_connection("acme").await);
    assert!(!hub.test_connection("ghost").await);
}

#[tokio::test]
async fn test_inactive_credential_not_used() {
    let server = MockServer::start().await;

    let hub = IntegrationHub::new(fast_config()).unwrap();
    hub.register_provider(crate::common::provider(&server.uri(), 100, 60_000, 500));

    let mut credential = api_key_credential();
    credential.active = false;
    hub.set_credentials(credential).await.unwrap();

    let response = hub.make_request(search_request("rust")).await;
    assert!(!response.success);
    assert_eq!(response.error.unwrap().code, "CREDENTIAL_ERROR");
}
