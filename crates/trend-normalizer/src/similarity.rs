//! Similarity scoring against the canonical topic registry.

use crate::types::Registry;

/// Calculate cosine similarity between two vectors.
///
/// Returns a value in [-1.0, 1.0] where 1.0 = identical direction, or 0.0
/// when either vector has zero magnitude or the dimensions differ (which
/// only happens if registry entries were produced by a different model than
/// the candidate - those entries simply never win).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Find the registry entry most similar to a candidate vector.
///
/// Scans every entry and keeps the strictly highest score; on a tie the
/// first entry in registry iteration order wins, which is deterministic
/// because the registry is a `BTreeMap`. An empty registry (or one where
/// nothing scores above 0.0) yields `(None, 0.0)`.
pub fn best_match<'a>(candidate: &[f32], registry: &'a Registry) -> (Option<&'a str>, f32) {
    let mut best_topic: Option<&str> = None;
    let mut best_score = 0.0f32;

    for (name, topic) in registry {
        let score = cosine_similarity(candidate, &topic.embedding);
        if score > best_score {
            best_score = score;
            best_topic = Some(name.as_str());
        }
    }

    (best_topic, best_score)
}
