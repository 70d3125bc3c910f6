//! Built-in provider definitions
//!
//! Constructed at process start; callers can register further providers or
//! overwrite these at runtime.

use super::types::{
    AuthType, Endpoint, ParamType, Parameter, Provider, ProviderCategory, ProviderStatus,
    RateLimit,
};
use crate::core::types::HttpMethod;
use serde_json::json;

/// The default provider catalogue
pub fn default_providers() -> Vec<Provider> {
    vec![openai(), serpstack(), mailchimp()]
}

fn openai() -> Provider {
    Provider {
        id: "openai".into(),
        name: "OpenAI".into(),
        category: ProviderCategory::AiCompletion,
        base_url: "https://api.openai.com/v1".into(),
        auth_type: AuthType::Bearer,
        rate_limit: RateLimit {
            requests_allowed: 500,
            window_ms: 60_000,
        },
        endpoints: vec![
            Endpoint::new("chat-completions", "/chat/completions", HttpMethod::Post)
                .describe("Generate a model completion for a chat conversation")
                .with_parameters(vec![
                    Parameter::required("model", ParamType::String),
                    Parameter::required("messages", ParamType::Array),
                    Parameter::optional("temperature", ParamType::Number)
                        .with_min(0.0)
                        .with_max(2.0),
                    Parameter::optional("max_tokens", ParamType::Number).with_min(1.0),
                ])
                .retryable()
                .with_timeout_ms(60_000),
            Endpoint::new("models", "/models", HttpMethod::Get)
                .describe("List available models")
                .cacheable_for_ms(3_600_000)
                .retryable(),
        ],
        status: ProviderStatus::Active,
        priority: 1,
        reliability: 0.99,
        test_endpoint: Some("models".into()),
    }
}

fn serpstack() -> Provider {
    Provider {
        id: "serpstack".into(),
        name: "Serpstack".into(),
        category: ProviderCategory::Seo,
        base_url: "https://api.serpstack.com".into(),
        auth_type: AuthType::ApiKey,
        rate_limit: RateLimit {
            requests_allowed: 60,
            window_ms: 60_000,
        },
        endpoints: vec![Endpoint::new("search", "/search", HttpMethod::Get)
            .describe("Search engine results for a query")
            .with_parameters(vec![
                Parameter::required("query", ParamType::String),
                Parameter::optional("num", ParamType::Number)
                    .with_min(1.0)
                    .with_max(100.0),
                Parameter::optional("output", ParamType::String)
                    .with_allowed_values(vec![json!("json"), json!("csv")]),
            ])
            .cacheable_for_ms(600_000)
            .retryable()],
        status: ProviderStatus::Active,
        priority: 2,
        reliability: 0.97,
        test_endpoint: None,
    }
}

fn mailchimp() -> Provider {
    Provider {
        id: "mailchimp".into(),
        name: "Mailchimp".into(),
        category: ProviderCategory::Marketing,
        base_url: "https://us1.api.mailchimp.com/3.0".into(),
        auth_type: AuthType::Basic,
        rate_limit: RateLimit {
            requests_allowed: 10,
            window_ms: 1_000,
        },
        endpoints: vec![
            Endpoint::new("ping", "/ping", HttpMethod::Get)
                .describe("Health check for the API and the supplied credentials"),
            Endpoint::new("campaigns", "/campaigns", HttpMethod::Get)
                .describe("List campaigns")
                .with_parameters(vec![Parameter::optional("count", ParamType::Number)
                    .with_min(1.0)
                    .with_max(1000.0)])
                .cacheable_for_ms(60_000)
                .retryable(),
            Endpoint::new("create-campaign", "/campaigns", HttpMethod::Post)
                .describe("Create a campaign")
                .with_parameters(vec![
                    Parameter::required("type", ParamType::String).with_allowed_values(vec![
                        json!("regular"),
                        json!("plaintext"),
                        json!("variate"),
                    ]),
                    Parameter::optional("settings", ParamType::Object),
                ]),
        ],
        status: ProviderStatus::Active,
        priority: 3,
        reliability: 0.98,
        test_endpoint: Some("ping".into()),
    }
}
