//! Error types for the MediaHome directory client

use reqwest::StatusCode;

/// Result type alias for directory operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the directory service
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid credentials (HTTP 401 from the directory service)
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Any other non-success status from the directory service
    #[error("Directory request failed ({status}): {reason}")]
    BadRequest { status: u16, reason: String },

    /// Lookup miss, or the resolver exhausted all candidates
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed directory response
    #[error("XML parsing error: {0}")]
    Xml(#[from] xmltree::ParseError),
}

impl Error {
    /// Map a non-success HTTP status to the matching error variant
    pub(crate) fn from_status(status: StatusCode) -> Self {
        let reason = status
            .canonical_reason()
            .unwrap_or("unknown")
            .to_string();
        match status.as_u16() {
            401 => Self::Unauthorized(format!("({}) {}", status.as_u16(), reason)),
            code => Self::BadRequest {
                status: code,
                reason,
            },
        }
    }

    /// Create a NotFound error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
