//! In-memory credential store
//!
//! One active credential per provider. Probe validation happens in the hub
//! before [`CredentialStore::insert`] is called, so the store only ever
//! swaps in credentials that already passed their probe; a failed probe
//! leaves the prior entry untouched.

use super::auth::Credential;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Credential store shared across concurrent callers
pub struct CredentialStore {
    credentials: RwLock<HashMap<String, Credential>>,
}

impl CredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            credentials: RwLock::new(HashMap::new()),
        }
    }

    /// Store a credential, replacing any prior credential for the same
    /// provider in one atomic swap
    pub fn insert(&self, credential: Credential) {
        debug!(provider = %credential.provider_id, "storing credential");
        self.credentials
            .write()
            .insert(credential.provider_id.clone(), credential);
    }

    /// The active credential for a provider, if any
    pub fn get_active(&self, provider_id: &str) -> Option<Credential> {
        self.credentials
            .read()
            .get(provider_id)
            .filter(|c| c.active)
            .cloned()
    }

    /// Remove a provider's credential
    pub fn remove(&self, provider_id: &str) -> Option<Credential> {
        self.credentials.write().remove(provider_id)
    }

    /// Number of stored credentials, active or not
    pub fn len(&self) -> usize {
        self.credentials.read().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.credentials.read().is_empty()
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}
