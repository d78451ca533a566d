//! Store error types.

use thiserror::Error;

/// Errors that can occur during store operations.
///
/// "Missing" and "corrupt" are deliberately absent: both are recovered
/// locally as an empty collection and never surfaced to callers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O failure other than a missing file (permissions, disk full, ...)
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Atomic replacement of the collection file failed
    #[error("Failed to persist collection {collection}: {source}")]
    Persist {
        collection: String,
        #[source]
        source: std::io::Error,
    },

    /// Collection could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
