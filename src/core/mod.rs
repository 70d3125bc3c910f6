//! Core functionality of the hub
//!
//! This module contains the request pipeline and the subsystems it
//! composes.

pub mod cache;
pub mod credentials;
pub mod executor;
pub mod hub;
pub mod rate_limiter;
pub mod registry;
pub mod types;
pub mod validator;
