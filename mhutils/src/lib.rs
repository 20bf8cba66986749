//! Shared utilities for the MediaHome client crates.
//!
//! Currently this crate hosts the process-wide secret filter used to keep
//! authentication tokens out of log output. See [`secrets`] for details.

pub mod secrets;

pub use secrets::{SecretFilter, add_secret, get_secret_filter, redact};
