//! Process-wide secret redaction.
//!
//! Every authentication token parsed from a directory response is registered
//! here before it is used. Log statements that may contain a token pass
//! their message through [`redact`] so the token never appears verbatim.
//!
//! The set is append-only: secrets stay registered for the lifetime of the
//! process. Registration is idempotent.
//!
//! # Example
//!
//! ```
//! use mhutils::secrets;
//!
//! secrets::add_secret("s3cr3t-token");
//! let line = secrets::redact("GET /devices.xml?token=s3cr3t-token");
//! assert_eq!(line, "GET /devices.xml?token=<hidden>");
//! ```

use lazy_static::lazy_static;
use std::collections::HashSet;
use std::sync::RwLock;
use tracing::debug;

/// Replacement string substituted for registered secrets
pub const REDACTED: &str = "<hidden>";

lazy_static! {
    static ref FILTER: SecretFilter = SecretFilter::new();
}

/// Append-only set of secrets with substring redaction
///
/// A process-wide instance is available through [`get_secret_filter`].
/// Separate instances can be created for tests or for callers that want to
/// keep their secrets out of the global set.
#[derive(Debug, Default)]
pub struct SecretFilter {
    secrets: RwLock<HashSet<String>>,
}

impl SecretFilter {
    /// Create an empty filter
    pub fn new() -> Self {
        Self {
            secrets: RwLock::new(HashSet::new()),
        }
    }

    /// Register a secret. Empty strings are ignored, duplicates have no effect.
    pub fn add_secret(&self, secret: impl Into<String>) {
        let secret = secret.into();
        if secret.is_empty() {
            return;
        }
        let mut secrets = match self.secrets.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if secrets.insert(secret) {
            debug!("Registered secret for redaction ({} total)", secrets.len());
        }
    }

    /// True if `secret` has been registered
    pub fn contains(&self, secret: &str) -> bool {
        match self.secrets.read() {
            Ok(guard) => guard.contains(secret),
            Err(poisoned) => poisoned.into_inner().contains(secret),
        }
    }

    /// Number of registered secrets
    pub fn len(&self) -> usize {
        match self.secrets.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// True if no secret has been registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace every occurrence of every registered secret in `text`
    pub fn redact(&self, text: &str) -> String {
        let secrets = match self.secrets.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut redacted = text.to_string();
        for secret in secrets.iter() {
            if redacted.contains(secret.as_str()) {
                redacted = redacted.replace(secret.as_str(), REDACTED);
            }
        }
        redacted
    }
}

/// Return the process-wide secret filter
pub fn get_secret_filter() -> &'static SecretFilter {
    &FILTER
}

/// Register a secret with the process-wide filter
pub fn add_secret(secret: impl Into<String>) {
    FILTER.add_secret(secret);
}

/// Redact `text` using the process-wide filter
pub fn redact(text: &str) -> String {
    FILTER.redact(text)
}
