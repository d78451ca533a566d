//! # trend-embeddings
//!
//! Embedding provider adapter for the topic normalization engine.
//!
//! The rest of the system only sees the [`EmbeddingModel`] trait; which
//! concrete model sits behind it is an operational choice. Two
//! implementations ship here:
//!
//! - [`LexicalEmbedder`]: deterministic, offline feature-hashing embedder.
//!   Not a neural model, but stable and dependency-light, which is what the
//!   normalization core needs for reproducible behavior.
//! - [`BoundedEmbedder`]: wraps any model and enforces a wall-clock timeout
//!   so an unresponsive provider surfaces as an error instead of a hang.
//!
//! Distances are only meaningful when every registry embedding comes from
//! the same model, so the provider must stay fixed for the lifetime of a
//! topic registry.

pub mod bounded;
pub mod error;
pub mod lexical;
pub mod model;

pub use bounded::BoundedEmbedder;
pub use error::EmbeddingError;
pub use lexical::{LexicalEmbedder, DEFAULT_LEXICAL_DIM};
pub use model::{Embedding, EmbeddingModel, ModelInfo};
