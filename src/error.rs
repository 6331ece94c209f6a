// Error types module

use crate::origin::OriginError;
use crate::store::StoreError;

/// Failure while serving a single request through the gateway
///
/// None of these reach the client as a status code: upstream failures fall
/// back to the store, and everything that survives the fallback is rendered
/// by the error boundary.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Origin unreachable, timed out, failed a redirect or answered non-2xx
    #[error("Upstream unavailable: {0}")]
    Upstream(#[from] OriginError),

    /// Nothing usable on disk after an upstream failure
    #[error("Not found locally: {path}")]
    NotFoundLocally { path: String },

    /// The key resolves to a directory rather than a file
    #[error("Path is a directory: {path}")]
    DirectoryConflict { path: String },

    /// Store I/O failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
