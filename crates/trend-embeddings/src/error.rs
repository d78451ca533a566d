//! Embedding error types.

use thiserror::Error;

/// Errors that can occur during embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Provider failed to produce an embedding
    #[error("Embedding provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Provider did not answer within the configured bound
    #[error("Embedding call timed out after {waited_ms}ms")]
    Timeout { waited_ms: u64 },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EmbeddingError {
    /// True for the failure modes where the provider could not be reached
    /// or did not answer in time. Callers must abort the surrounding
    /// operation on these rather than treating them as "no match".
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            EmbeddingError::ProviderUnavailable(_) | EmbeddingError::Timeout { .. }
        )
    }
}
