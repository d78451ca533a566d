//! # trend-normalizer
//!
//! Topic normalization engine for feedback trend analysis.
//!
//! Keyword extraction produces raw topic strings with a lot of vocabulary
//! variation ("login", "sign-in failure", "cannot log in"). This crate
//! collapses them into stable canonical labels so trend counts aggregate
//! correctly: each raw topic is embedded, scored against every known
//! canonical topic by cosine similarity, and either adopted as an alias of
//! the best match or promoted to a new canonical topic. The vocabulary only
//! grows; decisions are cached per raw topic.
//!
//! The engine owns two persisted collections, the canonical topic registry
//! and the normalization cache, and is the sole writer of both.

pub mod error;
pub mod normalizer;
pub mod similarity;
pub mod types;

pub use error::NormalizeError;
pub use normalizer::TopicNormalizer;
pub use similarity::{best_match, cosine_similarity};
pub use types::{
    CacheEntry, CanonicalTopic, Registry, TopicCache, CACHE_COLLECTION, REGISTRY_COLLECTION,
};
