//! Integration hub
//!
//! The orchestrator composing every subsystem behind `make_request`.

#[allow(clippy::module_inception)]
mod hub;


pub use hub::{HubStats, IntegrationHub};
