//! Upstream registry access
//!
//! The gateway talks to the canonical registry only through the [`Origin`]
//! trait, so the fetch orchestration can be tested without a network.

use async_trait::async_trait;
use bytes::Bytes;

pub mod http;

pub use self::http::HttpOrigin;

/// Headers that describe a single hop and are never relayed
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Whether a header may be relayed to the downstream client
pub fn is_relayable_header(name: &str) -> bool {
    !HOP_BY_HOP_HEADERS
        .iter()
        .any(|hop| hop.eq_ignore_ascii_case(name))
}

/// Response received from the origin
#[derive(Debug, Clone, Default)]
pub struct OriginResponse {
    pub status: u16,
    /// Relayable headers, in the order received
    pub headers: Vec<(String, String)>,
    /// Fully read body (empty for HEAD)
    pub body: Bytes,
}

impl OriginResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Error type for origin requests
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OriginError {
    /// Request timed out
    #[error("Upstream request timed out: {url}")]
    Timeout { url: String },

    /// Could not connect to the origin
    #[error("Failed to connect to upstream {url}: {message}")]
    Connect { url: String, message: String },

    /// Redirect chain failed (too many hops or protocol downgrade)
    #[error("Upstream redirect failed for {url}: {message}")]
    Redirect { url: String, message: String },

    /// Origin answered with a non-success status
    #[error("Upstream returned status {status} for {url}")]
    Status { url: String, status: u16 },

    /// Body could not be read to completion
    #[error("Failed to read upstream body from {url}: {message}")]
    Body { url: String, message: String },

    /// Any other request failure
    #[error("Upstream request to {url} failed: {message}")]
    Request { url: String, message: String },
}

/// The canonical upstream registry
#[async_trait]
pub trait Origin: Send + Sync {
    /// GET `target` (`path[?query]`) and read the whole body.
    /// Non-success statuses are errors.
    async fn fetch(&self, target: &str) -> Result<OriginResponse, OriginError>;

    /// HEAD `target`; any status is returned as-is.
    async fn head(&self, target: &str) -> Result<OriginResponse, OriginError>;
}
