//! HTTP client for the MediaHome directory service.
//!
//! The directory service is the account/device/resource catalog: it signs
//! users in and lists the resources, devices, and linked users attached to
//! an account. This client issues the authenticated requests and maps the
//! XML responses to the record types in [`crate::models`].
//!
//! # Example
//!
//! ```no_run
//! use mhdirectory::DirectoryClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DirectoryClient::new()?;
//!     let account = client.sign_in("alice", "password").await?;
//!     for resource in client.resources(&account.auth_token).await? {
//!         println!("{} (owned: {})", resource.name, resource.owned);
//!     }
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::lookup::find_by_attribute;
use crate::models::{Account, Device, LinkedUser, Resource};
use crate::xml;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};
use xmltree::Element;

/// Default directory service base URL
pub const DEFAULT_BASE_URL: &str = "https://directory.mediahome.tv";

/// Default timeout for directory requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "MediaHome/0.1.0 (mhdirectory)";

/// Header carrying the bearer token on authenticated requests
pub const TOKEN_HEADER: &str = "X-MediaHome-Token";

const SIGN_IN_PATH: &str = "/users/sign_in.xml";
const RESOURCES_PATH: &str = "/api/resources?includeHttps=1";
const USERS_PATH: &str = "/api/users/";
const DEVICES_PATH: &str = "/devices.xml";

/// Directory service HTTP client.
///
/// The client is stateless: the account token obtained from
/// [`sign_in`](DirectoryClient::sign_in) is passed explicitly to each
/// listing call. Endpoints and timeout are configured through
/// [`builder`](DirectoryClient::builder); overriding the base URL is also
/// the seam used by the HTTP-stub tests.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    client: Client,
    base_url: String,
}

impl DirectoryClient {
    /// Create a client with default settings
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from a custom `reqwest::Client`
    ///
    /// Useful for sharing HTTP connection pools or custom proxy settings
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sign in with username and password.
    ///
    /// Credentials travel as HTTP Basic auth. A 401 response maps to
    /// [`Error::Unauthorized`]; any other non-success status maps to
    /// [`Error::BadRequest`] carrying the status code and reason phrase.
    /// On success the response is parsed into an [`Account`] whose token
    /// is registered for log redaction before the account is returned.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<Account> {
        let url = format!("{}{}", self.base_url, SIGN_IN_PATH);
        info!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .basic_auth(username, Some(password))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Sign-in failed with status {}", status);
            return Err(Error::from_status(status));
        }
        let body = response.text().await?;
        let root = xml::parse_root(&body)?;
        Ok(Account::from_element(&root))
    }

    /// List all resources (servers and players) linked to the account
    pub async fn resources(&self, token: &str) -> Result<Vec<Resource>> {
        Ok(self
            .fetch_items(RESOURCES_PATH, token)
            .await?
            .iter()
            .map(Resource::from_element)
            .collect())
    }

    /// Return the resource matching `name`
    pub async fn resource(&self, token: &str, name: &str) -> Result<Resource> {
        let resources = self.resources(token).await?;
        Ok(find_by_attribute(&resources, name, &["name"])?.clone())
    }

    /// List all devices linked to the account
    pub async fn devices(&self, token: &str) -> Result<Vec<Device>> {
        Ok(self
            .fetch_items(DEVICES_PATH, token)
            .await?
            .iter()
            .map(Device::from_element)
            .collect())
    }

    /// Return the device matching `name`
    pub async fn device(&self, token: &str, name: &str) -> Result<Device> {
        let devices = self.devices(token).await?;
        Ok(find_by_attribute(&devices, name, &["name"])?.clone())
    }

    /// List all friend and sub-accounts linked to the account
    pub async fn users(&self, token: &str) -> Result<Vec<LinkedUser>> {
        Ok(self
            .fetch_items(USERS_PATH, token)
            .await?
            .iter()
            .map(LinkedUser::from_element)
            .collect())
    }

    /// Return the linked user matching `name_or_email` against username or
    /// email
    pub async fn user(&self, token: &str, name_or_email: &str) -> Result<LinkedUser> {
        let users = self.users(token).await?;
        Ok(find_by_attribute(&users, name_or_email, &["username", "email"])?.clone())
    }

    /// Authenticated GET returning the top-level elements of the response
    async fn fetch_items(&self, path: &str, token: &str) -> Result<Vec<Element>> {
        let url = format!("{}{}", self.base_url, path);
        info!(
            "{}",
            mhutils::redact(&format!("GET {url} token={token}"))
        );
        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Directory request failed with status {}", status);
            return Err(Error::from_status(status));
        }
        let body = response.text().await?;
        xml::parse_children(&body)
    }
}

/// Builder for [`DirectoryClient`]
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientBuilder {
    /// Override the directory service base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the User-Agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<DirectoryClient> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()?;
        Ok(DirectoryClient {
            client,
            base_url: self.base_url.trim_end_matches('/').to_string(),
        })
    }
}
