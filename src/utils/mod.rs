//! Shared utilities for the hub

pub mod error;
pub mod logging;

pub use error::{HubError, Result, ValidationError};
