//! Credential material and auth header construction
//!
//! Each scheme builds its headers through one exhaustive match; adding a
//! scheme is a compile-time change, not a runtime string switch.

use crate::core::registry::AuthType;
use crate::utils::error::{HubError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

/// Opaque secret material for one provider
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AuthMaterial {
    /// Plain API key, sent in a provider-chosen header
    ApiKey {
        key: String,
        /// Header to carry the key; `Authorization: Bearer` when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        header_name: Option<String>,
    },
    /// Bearer token
    Bearer { token: String },
    /// HTTP basic auth
    Basic { username: String, password: String },
    /// OAuth token pair. Refresh is out of scope; the access token is
    /// injected as-is.
    OAuth {
        access_token: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        refresh_token: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expires_at: Option<DateTime<Utc>>,
    },
}

impl AuthMaterial {
    /// The scheme this material satisfies
    pub fn auth_type(&self) -> AuthType {
        match self {
            Self::ApiKey { .. } => AuthType::ApiKey,
            Self::Bearer { .. } => AuthType::Bearer,
            Self::Basic { .. } => AuthType::Basic,
            Self::OAuth { .. } => AuthType::OAuth,
        }
    }

    /// Build the outbound auth headers for this material
    pub fn build_auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        match self {
            Self::ApiKey { key, header_name } => match header_name {
                Some(name) => {
                    let name = HeaderName::from_bytes(name.as_bytes())
                        .map_err(|e| HubError::Credential(format!("invalid header name: {e}")))?;
                    headers.insert(name, sensitive_value(key)?);
                }
                None => {
                    headers.insert(AUTHORIZATION, sensitive_value(&format!("Bearer {key}"))?);
                }
            },
            Self::Bearer { token } => {
                headers.insert(AUTHORIZATION, sensitive_value(&format!("Bearer {token}"))?);
            }
            Self::Basic { username, password } => {
                let encoded = BASE64.encode(format!("{username}:{password}"));
                headers.insert(AUTHORIZATION, sensitive_value(&format!("Basic {encoded}"))?);
            }
            Self::OAuth { access_token, .. } => {
                headers.insert(
                    AUTHORIZATION,
                    sensitive_value(&format!("Bearer {access_token}"))?,
                );
            }
        }
        Ok(headers)
    }
}

fn sensitive_value(value: &str) -> Result<HeaderValue> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|e| HubError::Credential(format!("invalid header value: {e}")))?;
    header.set_sensitive(true);
    Ok(header)
}

// Secrets never appear in logs or debug output.
impl std::fmt::Debug for AuthMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey { header_name, .. } => f
                .debug_struct("ApiKey")
                .field("header_name", header_name)
                .finish_non_exhaustive(),
            Self::Bearer { .. } => f.debug_struct("Bearer").finish_non_exhaustive(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            Self::OAuth { expires_at, .. } => f
                .debug_struct("OAuth")
                .field("expires_at", expires_at)
                .finish_non_exhaustive(),
        }
    }
}

/// Credential set for one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    /// Provider this credential belongs to
    pub provider_id: String,
    /// Secret material
    pub material: AuthMaterial,
    /// Granted scopes, informational
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Owning organization or user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Inactive credentials are never consulted at request time
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Credential {
    /// An active credential with no scopes or owner
    pub fn new(provider_id: impl Into<String>, material: AuthMaterial) -> Self {
        Self {
            provider_id: provider_id.into(),
            material,
            scopes: Vec::new(),
            owner: None,
            active: true,
        }
    }
}
