//! Error types for the sync layer.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors raised by remote services and option validation.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The entity changed remotely since it was read; its version is stale.
    #[error("concurrent modification: {0}")]
    ConcurrentModification(String),

    /// The addressed entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The remote system rejected the request.
    #[error("remote error: {0}")]
    Remote(String),

    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Sync options failed validation.
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl SyncError {
    /// Whether the update failed on a stale version and may be retried
    /// against a freshly fetched entity.
    pub fn is_concurrent_modification(&self) -> bool {
        matches!(self, Self::ConcurrentModification(_))
    }
}
