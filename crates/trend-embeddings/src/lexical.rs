//! Deterministic lexical embedding.
//!
//! Feature hashing over lowercased alphanumeric tokens: each token is
//! hashed with blake3 and mapped to a signed bucket of a fixed-dimension
//! vector. This is *not* a neural embedding model; it is a stable, offline
//! baseline that gives identical vectors for identical text across runs
//! and machines, which is exactly what the topic registry requires.

use blake3::Hasher;

use crate::error::EmbeddingError;
use crate::model::{Embedding, EmbeddingModel, ModelInfo};

/// Default dimensionality for lexical embeddings.
///
/// Kept modest: the registry holds one vector per canonical topic and is
/// scanned linearly.
pub const DEFAULT_LEXICAL_DIM: usize = 256;

/// Deterministic feature-hashing embedder.
#[derive(Debug)]
pub struct LexicalEmbedder {
    info: ModelInfo,
}

impl LexicalEmbedder {
    /// Create an embedder with the default dimension.
    pub fn new() -> Self {
        Self::with_dimension(DEFAULT_LEXICAL_DIM)
    }

    /// Create an embedder with a custom dimension.
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            info: ModelInfo {
                name: format!("lexical-blake3-{}", dimension),
                dimension,
            },
        }
    }
}

impl Default for LexicalEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddingModel for LexicalEmbedder {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let dim = self.info.dimension;
        if dim == 0 {
            return Err(EmbeddingError::InvalidInput(
                "embedding dimension must be > 0".to_string(),
            ));
        }

        let mut values = vec![0.0f32; dim];
        for token in tokenize(text) {
            let mut hasher = Hasher::new();
            hasher.update(token.as_bytes());
            let hash = hasher.finalize();
            let bytes = hash.as_bytes();

            let mut bucket = 0u64;
            for (i, b) in bytes[..8].iter().enumerate() {
                bucket |= u64::from(*b) << (8 * i);
            }
            // Ninth byte decides the sign so colliding tokens can cancel
            // instead of always reinforcing.
            let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
            values[(bucket % dim as u64) as usize] += sign;
        }

        Ok(Embedding::new(values))
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}
