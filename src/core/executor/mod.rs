//! Request execution
//!
//! Builds headers, URL, and body for the outbound call, performs it with a
//! per-attempt timeout, retries with exponential backoff, and extracts
//! provider rate-limit hints from response headers.

mod executor;


pub use executor::{ExecutionFailure, ExecutionOutcome, RequestExecutor};
