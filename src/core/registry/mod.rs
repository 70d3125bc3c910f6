//! Provider registry
//!
//! Static catalogue of providers and their endpoints. Registration is
//! last-write-wins on id collision; lookups are pure.

pub mod catalog;
mod types;


pub use types::{
    AuthType, Endpoint, ParamType, Parameter, Provider, ProviderCategory, ProviderStatus,
    RateLimit,
};

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Registry of provider definitions, shared across concurrent callers
pub struct ProviderRegistry {
    providers: RwLock<HashMap<String, Arc<Provider>>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            providers: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry preloaded with the built-in catalog
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        for provider in catalog::default_providers() {
            registry.register(provider);
        }
        registry
    }

    /// Register a provider. An existing definition under the same id is
    /// overwritten (last write wins).
    pub fn register(&self, provider: Provider) {
        debug!(provider = %provider.id, endpoints = provider.endpoints.len(), "registering provider");
        self.providers
            .write()
            .insert(provider.id.clone(), Arc::new(provider));
    }

    /// Get a provider by id
    pub fn get(&self, id: &str) -> Option<Arc<Provider>> {
        self.providers.read().get(id).cloned()
    }

    /// List providers, optionally filtered by category
    pub fn list(&self, category: Option<ProviderCategory>) -> Vec<Arc<Provider>> {
        self.providers
            .read()
            .values()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .cloned()
            .collect()
    }

    /// Whether a provider is registered
    pub fn contains(&self, id: &str) -> bool {
        self.providers.read().contains_key(id)
    }

    /// Number of registered providers
    pub fn len(&self) -> usize {
        self.providers.read().len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.read().is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let providers = self.providers.read();
        f.debug_struct("ProviderRegistry")
            .field("provider_count", &providers.len())
            .field("providers", &providers.keys().collect::<Vec<_>>())
            .finish()
    }
}
