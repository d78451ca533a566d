//! # trend-extract
//!
//! Keyword-based raw topic extraction from free-text feedback.
//!
//! Deliberately lightweight: a configured keyword list matched
//! case-insensitively against the review text, with a fallback topic when
//! nothing matches. Stateless and deterministic, which keeps topic
//! assignment debuggable; the semantic heavy lifting happens downstream in
//! the normalizer.

use tracing::trace;
use trend_types::ExtractorConfig;

/// Extracts raw topic strings from review text.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    keywords: Vec<String>,
    fallback_topic: String,
}

impl KeywordExtractor {
    /// Build an extractor from configuration. Keywords are lowercased once
    /// here so extraction is a plain substring scan.
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            keywords: config.keywords.iter().map(|k| k.to_lowercase()).collect(),
            fallback_topic: config.fallback_topic.clone(),
        }
    }

    /// Extract raw topics from a piece of text.
    ///
    /// Returns every configured keyword that occurs in the text
    /// (case-insensitive substring match, keyword list order preserved),
    /// or the fallback topic when none do. Never returns an empty list.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let text_lower = text.to_lowercase();

        let mut found: Vec<String> = self
            .keywords
            .iter()
            .filter(|k| text_lower.contains(k.as_str()))
            .cloned()
            .collect();

        if found.is_empty() {
            found.push(self.fallback_topic.clone());
        }

        trace!(topics = found.len(), "extracted raw topics");
        found
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}
