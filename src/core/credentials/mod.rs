//! Credential handling
//!
//! Secret material per provider and the store holding the single active
//! credential set for each.

mod auth;
mod store;


pub use auth::{AuthMaterial, Credential};
pub use store::CredentialStore;
