//! Connected sessions and the probe seam.
//!
//! A [`Probe`] performs the actual handshake with a candidate endpoint and
//! either hands back a [`ConnectedSession`] or fails. The resolver treats
//! probes as opaque: the full remote-control protocol lives behind this
//! trait and is out of scope here. [`HttpProbe`] is the stock
//! implementation, a single authenticated GET against the candidate base
//! URL.

use crate::client::TOKEN_HEADER;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Default timeout for a single probe attempt (5 seconds)
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

/// A live connection to a resource or device.
///
/// Returned by a successful resolve; owned exclusively by the caller.
/// Wraps the winning base URL and the token used to reach it, for later
/// protocol use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedSession {
    base_url: String,
    token: String,
}

impl ConnectedSession {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Base URL of the winning endpoint
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token used to reach the endpoint
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// One connection attempt against a candidate endpoint.
///
/// Implementations must be cheap to call concurrently; the resolver spawns
/// one probe task per candidate and never retries.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, url: &str, token: &str) -> Result<ConnectedSession>;
}

/// Stock probe: an authenticated GET of the candidate base URL.
///
/// Any 2xx answer within the timeout counts as reachable.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    /// Create a probe with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS))
    }

    /// Create a probe with a custom per-attempt timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(&self, url: &str, token: &str) -> Result<ConnectedSession> {
        let response = self
            .client
            .get(url)
            .header(TOKEN_HEADER, token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::from_status(status));
        }
        Ok(ConnectedSession::new(url, token))
    }
}
