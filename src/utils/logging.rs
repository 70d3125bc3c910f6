//! Logging initialization
//!
//! The hub itself only emits `tracing` events; installing a subscriber is
//! the embedding application's choice. This helper wires up a sensible
//! default for binaries and examples that do not bring their own.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install a formatted subscriber honoring `RUST_LOG`, at `info` when the
/// variable is unset
///
/// Fails if a global subscriber is already installed.
pub fn init() -> Result<(), String> {
    init_with_level(Level::INFO)
}

/// Install a formatted subscriber with an explicit fallback level
pub fn init_with_level(level: Level) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| format!("failed to install tracing subscriber: {e}"))
}
