//! MediaHome directory client library.
//!
//! This crate talks to the MediaHome account directory: it signs a user in,
//! lists the resources (servers, players), devices, and linked users
//! attached to the account, and establishes a live connection to the
//! best-reachable endpoint a resource or device advertises.
//!
//! # Features
//!
//! - **Sign-in**: credential POST returning a typed [`Account`]
//! - **Listings**: resources, devices, and linked users, parsed from the
//!   directory's XML attribute bags in document order
//! - **Lookup**: case-insensitive search by name, username, or email
//! - **Connection resolution**: concurrent probing of every advertised
//!   endpoint with a deterministic preference order (local before remote,
//!   TLS before plain)
//! - **Token redaction**: every token parsed from a response is registered
//!   with the process-wide secret filter before it can reach a log line
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mhdirectory::{DirectoryClient, HttpProbe, SslPreference};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DirectoryClient::new()?;
//!     let account = client.sign_in("alice", "password").await?;
//!
//!     let resource = client.resource(&account.auth_token, "office").await?;
//!     let probe = Arc::new(HttpProbe::new()?);
//!     let session = resource.connect(SslPreference::Either, probe).await?;
//!     println!("Connected to {}", session.base_url());
//!     Ok(())
//! }
//! ```
//!
//! # Connection resolution
//!
//! A resource may advertise several endpoints (LAN address, public relay,
//! with and without TLS). [`Resource::connect`] probes all of them
//! concurrently, waits for every probe to finish, then picks the first
//! success in preference order, so the outcome is reproducible no matter
//! which probe answered first. See [`resolve`] for details.

pub mod client;
pub mod error;
pub mod lookup;
pub mod models;
pub mod resolve;
pub mod session;

mod xml;

pub use client::{ClientBuilder, DirectoryClient, DEFAULT_BASE_URL, TOKEN_HEADER};
pub use error::{Error, Result};
pub use lookup::{find_by_attribute, LookupFields};
pub use models::{Account, Device, LinkedUser, Resource, ResourceConnection};
pub use resolve::{plan_candidates, resolve, SslPreference};
pub use session::{ConnectedSession, HttpProbe, Probe};
