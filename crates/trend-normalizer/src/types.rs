//! Persisted vocabulary types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Collection name for the canonical topic registry.
pub const REGISTRY_COLLECTION: &str = "topic_registry";

/// Collection name for the normalization cache.
pub const CACHE_COLLECTION: &str = "topic_cache";

/// A canonical topic as stored in the registry.
///
/// The registry key is the canonical label itself (trimmed, lowercased).
/// The embedding is computed once when the topic is created and never
/// recomputed, so all distances stay comparable for the lifetime of the
/// registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalTopic {
    /// Semantic vector of the label at creation time
    pub embedding: Vec<f32>,
}

impl CanonicalTopic {
    /// Create a registry entry from an embedding vector.
    pub fn new(embedding: Vec<f32>) -> Self {
        Self { embedding }
    }
}

/// A cached normalization decision.
///
/// The cache key is the normalized raw topic. `confidence` is the
/// similarity score that produced the mapping (1.0 when the raw topic was
/// itself promoted to canonical); it is informational only and never drives
/// later decisions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheEntry {
    /// Canonical label this raw topic resolves to
    pub canonical: String,
    /// Similarity score behind the mapping, rounded to 3 decimals
    pub confidence: f32,
}

impl CacheEntry {
    /// Create a cache entry.
    pub fn new(canonical: impl Into<String>, confidence: f32) -> Self {
        Self {
            canonical: canonical.into(),
            confidence,
        }
    }
}

/// Canonical topic registry, keyed by canonical label.
///
/// `BTreeMap` keeps iteration (and therefore similarity tie-breaking and
/// the persisted form) deterministic.
pub type Registry = BTreeMap<String, CanonicalTopic>;

/// Normalization cache, keyed by normalized raw topic.
pub type TopicCache = BTreeMap<String, CacheEntry>;
