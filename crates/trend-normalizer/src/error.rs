//! Normalization error types.

use thiserror::Error;

/// Errors that can occur while normalizing a raw topic.
///
/// Every variant is fatal to the single `normalize` call that raised it and
/// guarantees that neither the registry nor the cache was mutated. Callers
/// running a batch are expected to log and skip the one failed item.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Raw topic failed validation (empty after trimming)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Embedding provider failed or timed out
    #[error("Embedding error: {0}")]
    Embedding(#[from] trend_embeddings::EmbeddingError),

    /// Persistent store failure other than missing/corrupt state
    #[error("Store error: {0}")]
    Store(#[from] trend_store::StoreError),

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] trend_types::ConfigError),
}
