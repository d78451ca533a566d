//! Normalization coordinator.
//!
//! Owns the canonical topic registry and the normalization cache and runs
//! the full lookup-decide-persist sequence for each raw topic. All
//! vocabulary growth goes through [`TopicNormalizer::normalize`]; nothing
//! else writes the two collections.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, instrument};
use trend_embeddings::{Embedding, EmbeddingModel};
use trend_store::JsonStore;
use trend_types::NormalizerConfig;

use crate::error::NormalizeError;
use crate::similarity::best_match;
use crate::types::{
    CacheEntry, CanonicalTopic, Registry, TopicCache, CACHE_COLLECTION, REGISTRY_COLLECTION,
};

/// In-memory view of the two persisted collections.
///
/// Guarded by one mutex so a decision is always made against the same
/// registry snapshot it is persisted with: two concurrent misses cannot
/// both promote themselves for the same semantic cluster.
struct VocabularyState {
    registry: Registry,
    cache: TopicCache,
}

/// Topic normalization engine.
///
/// Maps raw topic strings to canonical topic labels, growing the canonical
/// vocabulary when a raw topic matches nothing above the acceptance
/// threshold. Decisions are cached per raw topic and both collections are
/// persisted on every mutation, registry first.
pub struct TopicNormalizer {
    store: JsonStore,
    embedder: Arc<dyn EmbeddingModel>,
    threshold: f32,
    state: Mutex<VocabularyState>,
}

impl TopicNormalizer {
    /// Create a normalizer over a store and an embedding model.
    ///
    /// Loads both collections; missing or corrupt state starts empty per
    /// the store's contract.
    pub fn new(
        store: JsonStore,
        embedder: Arc<dyn EmbeddingModel>,
        config: &NormalizerConfig,
    ) -> Result<Self, NormalizeError> {
        config.validate()?;
        let registry: Registry = store.load(REGISTRY_COLLECTION)?;
        let cache: TopicCache = store.load(CACHE_COLLECTION)?;
        info!(
            canonical_topics = registry.len(),
            cached_mappings = cache.len(),
            threshold = config.similarity_threshold,
            "topic normalizer loaded"
        );
        Ok(Self {
            store,
            embedder,
            threshold: config.similarity_threshold,
            state: Mutex::new(VocabularyState { registry, cache }),
        })
    }

    /// Normalize a raw topic into a canonical topic label.
    ///
    /// The input is trimmed and lowercased first; an input that is empty
    /// after that is rejected before any I/O. Cached raw topics return
    /// without touching the embedder or the registry. Otherwise the topic
    /// is embedded, scored against every canonical topic, and either
    /// recorded as an alias of the best match (score >= threshold,
    /// inclusive) or promoted to a new canonical topic.
    ///
    /// Fatal errors (provider unavailable, store I/O) leave both
    /// collections untouched, in memory and on disk.
    #[instrument(skip(self), fields(threshold = self.threshold))]
    pub fn normalize(&self, raw_topic: &str) -> Result<String, NormalizeError> {
        let topic = raw_topic.trim().to_lowercase();
        if topic.is_empty() {
            return Err(NormalizeError::InvalidInput(
                "raw topic is empty after normalization".to_string(),
            ));
        }

        let mut state = self.state.lock().expect("vocabulary mutex poisoned");

        // Fast path: this exact raw topic has been decided before.
        if let Some(entry) = state.cache.get(&topic) {
            debug!(%topic, canonical = %entry.canonical, "cache hit");
            return Ok(entry.canonical.clone());
        }

        // Bootstrap: the very first topic defines the vocabulary.
        if state.registry.is_empty() {
            let embedding = self.embedder.embed(&topic)?;
            self.persist_new_canonical(&mut state, &topic, embedding)?;
            self.persist_cache_entry(&mut state, topic.clone(), &topic, 1.0)?;
            info!(%topic, "bootstrapped canonical topic registry");
            return Ok(topic);
        }

        let candidate = self.embedder.embed(&topic)?;

        let (canonical, confidence, matched) = {
            let (best, score) = best_match(candidate.as_slice(), &state.registry);
            match best {
                Some(name) if score >= self.threshold => {
                    (name.to_string(), round_confidence(score), true)
                }
                _ => (topic.clone(), 1.0, false),
            }
        };

        if matched {
            debug!(%topic, %canonical, confidence, "accepted as alias");
        } else {
            // New semantic cluster: registry grows, and is persisted
            // before the cache entry that will reference it.
            self.persist_new_canonical(&mut state, &canonical, candidate)?;
            info!(%canonical, "created canonical topic");
        }

        self.persist_cache_entry(&mut state, topic, &canonical, confidence)?;
        Ok(canonical)
    }

    /// Number of canonical topics in the registry.
    pub fn registry_len(&self) -> usize {
        self.state
            .lock()
            .expect("vocabulary mutex poisoned")
            .registry
            .len()
    }

    /// Number of cached raw-topic mappings.
    pub fn cache_len(&self) -> usize {
        self.state
            .lock()
            .expect("vocabulary mutex poisoned")
            .cache
            .len()
    }

    /// All canonical topic labels, in registry order.
    pub fn canonical_topics(&self) -> Vec<String> {
        self.state
            .lock()
            .expect("vocabulary mutex poisoned")
            .registry
            .keys()
            .cloned()
            .collect()
    }

    /// Look up a cached decision without triggering normalization.
    pub fn cached(&self, raw_topic: &str) -> Option<CacheEntry> {
        let topic = raw_topic.trim().to_lowercase();
        self.state
            .lock()
            .expect("vocabulary mutex poisoned")
            .cache
            .get(&topic)
            .cloned()
    }

    /// The acceptance threshold in effect.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Insert a canonical topic and persist the registry, rolling the
    /// in-memory map back if the save fails.
    fn persist_new_canonical(
        &self,
        state: &mut VocabularyState,
        name: &str,
        embedding: Embedding,
    ) -> Result<(), NormalizeError> {
        state
            .registry
            .insert(name.to_string(), CanonicalTopic::new(embedding.into_values()));
        if let Err(e) = self.store.save(REGISTRY_COLLECTION, &state.registry) {
            state.registry.remove(name);
            return Err(e.into());
        }
        Ok(())
    }

    /// Upsert a cache entry and persist the cache, rolling the in-memory
    /// map back if the save fails.
    fn persist_cache_entry(
        &self,
        state: &mut VocabularyState,
        raw_topic: String,
        canonical: &str,
        confidence: f32,
    ) -> Result<(), NormalizeError> {
        let previous = state
            .cache
            .insert(raw_topic.clone(), CacheEntry::new(canonical, confidence));
        if let Err(e) = self.store.save(CACHE_COLLECTION, &state.cache) {
            match previous {
                Some(entry) => state.cache.insert(raw_topic, entry),
                None => state.cache.remove(&raw_topic),
            };
            return Err(e.into());
        }
        Ok(())
    }
}

/// Round a similarity score to 3 decimal places for cache confidence.
fn round_confidence(score: f32) -> f32 {
    (score * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use trend_embeddings::{EmbeddingError, ModelInfo};

    /// Embedder serving pre-scripted vectors, counting calls, and failing
    /// on any text it has no script for.
    struct ScriptedModel {
        info: ModelInfo,
        vectors: HashMap<String, Vec<f32>>,
        calls: AtomicUsize,
    }

    impl ScriptedModel {
        fn new(vectors: &[(&str, Vec<f32>)]) -> Self {
            Self {
                info: ModelInfo {
                    name: "scripted".to_string(),
                    dimension: vectors.first().map(|(_, v)| v.len()).unwrap_or(0),
                },
                vectors: vectors
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl EmbeddingModel for ScriptedModel {
        fn info(&self) -> &ModelInfo {
            &self.info
        }

        fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.vectors
                .get(text)
                .map(|v| Embedding::new(v.clone()))
                .ok_or_else(|| EmbeddingError::ProviderUnavailable(format!("no script for {text}")))
        }
    }

    fn harness(
        vectors: &[(&str, Vec<f32>)],
    ) -> (tempfile::TempDir, Arc<ScriptedModel>, TopicNormalizer) {
        harness_with_threshold(vectors, 0.75)
    }

    fn harness_with_threshold(
        vectors: &[(&str, Vec<f32>)],
        threshold: f32,
    ) -> (tempfile::TempDir, Arc<ScriptedModel>, TopicNormalizer) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("memory")).unwrap();
        let model = Arc::new(ScriptedModel::new(vectors));
        let config = NormalizerConfig {
            similarity_threshold: threshold,
            ..NormalizerConfig::default()
        };
        let normalizer = TopicNormalizer::new(store, model.clone(), &config).unwrap();
        (dir, model, normalizer)
    }

    #[test]
    fn test_bootstrap_first_topic_becomes_canonical() {
        let (_dir, model, normalizer) = harness(&[("login", vec![1.0, 0.0])]);

        let canonical = normalizer.normalize("  Login ").unwrap();
        assert_eq!(canonical, "login");
        assert_eq!(normalizer.registry_len(), 1);
        assert_eq!(normalizer.cache_len(), 1);
        assert_eq!(normalizer.cached("login").unwrap().confidence, 1.0);
        assert_eq!(model.calls(), 1);
    }

    #[test]
    fn test_idempotent_and_cache_short_circuits_embedding() {
        let (_dir, model, normalizer) = harness(&[("login", vec![1.0, 0.0])]);

        let first = normalizer.normalize("login").unwrap();
        let calls_after_first = model.calls();
        let second = normalizer.normalize("login").unwrap();

        assert_eq!(first, second);
        // Second call is served from the cache: no further embedding
        assert_eq!(model.calls(), calls_after_first);
        assert_eq!(normalizer.registry_len(), 1);
        assert_eq!(normalizer.cache_len(), 1);
    }

    #[test]
    fn test_empty_input_rejected_before_io() {
        let (_dir, model, normalizer) = harness(&[("login", vec![1.0, 0.0])]);

        let err = normalizer.normalize("   ").unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidInput(_)));
        assert_eq!(model.calls(), 0);
        assert_eq!(normalizer.registry_len(), 0);
        assert_eq!(normalizer.cache_len(), 0);
    }

    #[test]
    fn test_alias_above_threshold_does_not_grow_registry() {
        let (_dir, _model, normalizer) = harness(&[
            ("login", vec![1.0, 0.0]),
            ("cannot log in", vec![0.9, 0.2]),
        ]);

        normalizer.normalize("login").unwrap();
        let canonical = normalizer.normalize("cannot log in").unwrap();

        assert_eq!(canonical, "login");
        assert_eq!(normalizer.registry_len(), 1);
        assert_eq!(normalizer.cache_len(), 2);
        let entry = normalizer.cached("cannot log in").unwrap();
        assert_eq!(entry.canonical, "login");
        assert!(entry.confidence < 1.0 && entry.confidence > 0.75);
    }

    #[test]
    fn test_score_equal_to_threshold_is_accepted() {
        // Compute the exact score the engine will see, then use it as the
        // threshold: acceptance must be inclusive.
        let login = vec![1.0, 0.0];
        let candidate = vec![1.0, 1.0];
        let score = crate::similarity::cosine_similarity(
            Embedding::new(candidate.clone()).as_slice(),
            Embedding::new(login.clone()).as_slice(),
        );

        let (_dir, _model, normalizer) = harness_with_threshold(
            &[("login", login), ("sign in", candidate)],
            score,
        );

        normalizer.normalize("login").unwrap();
        let canonical = normalizer.normalize("sign in").unwrap();
        assert_eq!(canonical, "login");
        assert_eq!(normalizer.registry_len(), 1);
    }

    #[test]
    fn test_score_below_threshold_creates_new_cluster() {
        let (_dir, _model, normalizer) = harness(&[
            ("login", vec![1.0, 0.0]),
            ("payment failed", vec![0.0, 1.0]),
        ]);

        normalizer.normalize("login").unwrap();
        let canonical = normalizer.normalize("payment failed").unwrap();

        assert_eq!(canonical, "payment failed");
        assert_eq!(normalizer.registry_len(), 2);
        assert_eq!(
            normalizer.cached("payment failed").unwrap().confidence,
            1.0
        );
    }

    #[test]
    fn test_confidence_rounded_to_three_decimals() {
        // cos([2,1],[1,0]) = 2/sqrt(5) = 0.8944272
        let (_dir, _model, normalizer) = harness(&[
            ("login", vec![1.0, 0.0]),
            ("sign in broken", vec![2.0, 1.0]),
        ]);

        normalizer.normalize("login").unwrap();
        normalizer.normalize("sign in broken").unwrap();

        let entry = normalizer.cached("sign in broken").unwrap();
        assert_eq!(entry.confidence, 0.894);
    }

    #[test]
    fn test_provider_failure_leaves_no_trace() {
        let (_dir, _model, normalizer) = harness(&[("login", vec![1.0, 0.0])]);
        normalizer.normalize("login").unwrap();

        // "new topic" has no scripted vector: provider fails mid-scan
        let err = normalizer.normalize("new topic").unwrap_err();
        assert!(matches!(err, NormalizeError::Embedding(_)));

        assert_eq!(normalizer.registry_len(), 1);
        assert_eq!(normalizer.cache_len(), 1);
        assert!(normalizer.cached("new topic").is_none());
    }

    #[test]
    fn test_registry_save_failure_leaves_vocabulary_unchanged() {
        let (dir, _model, normalizer) = harness(&[
            ("login", vec![1.0, 0.0]),
            ("payment failed", vec![0.0, 1.0]),
        ]);
        normalizer.normalize("login").unwrap();

        // Squat a directory on the registry file so the atomic rename fails
        let registry_path = dir.path().join("memory").join("topic_registry.json");
        std::fs::remove_file(&registry_path).unwrap();
        std::fs::create_dir(&registry_path).unwrap();

        let err = normalizer.normalize("payment failed").unwrap_err();
        assert!(matches!(err, NormalizeError::Store(_)));

        assert_eq!(normalizer.registry_len(), 1);
        assert_eq!(normalizer.cache_len(), 1);
        assert!(normalizer.cached("payment failed").is_none());
        assert_eq!(normalizer.canonical_topics(), vec!["login".to_string()]);
    }

    #[test]
    fn test_cache_save_failure_rolls_back_cache_entry() {
        let (dir, _model, normalizer) = harness(&[
            ("login", vec![1.0, 0.0]),
            ("cannot log in", vec![0.9, 0.2]),
        ]);
        normalizer.normalize("login").unwrap();

        let cache_path = dir.path().join("memory").join("topic_cache.json");
        std::fs::remove_file(&cache_path).unwrap();
        std::fs::create_dir(&cache_path).unwrap();

        // Alias path: only the cache save runs, and it fails
        let err = normalizer.normalize("cannot log in").unwrap_err();
        assert!(matches!(err, NormalizeError::Store(_)));

        assert_eq!(normalizer.registry_len(), 1);
        assert_eq!(normalizer.cache_len(), 1);
        assert!(normalizer.cached("cannot log in").is_none());
    }

    #[test]
    fn test_vocabulary_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let state_dir = dir.path().join("memory");
        let vectors = [
            ("login", vec![1.0f32, 0.0]),
            ("payment failed", vec![0.0f32, 1.0]),
        ];
        let config = NormalizerConfig::default();

        {
            let store = JsonStore::open(&state_dir).unwrap();
            let model = Arc::new(ScriptedModel::new(&vectors));
            let normalizer = TopicNormalizer::new(store, model, &config).unwrap();
            normalizer.normalize("login").unwrap();
            normalizer.normalize("payment failed").unwrap();
        }

        let store = JsonStore::open(&state_dir).unwrap();
        let model = Arc::new(ScriptedModel::new(&vectors));
        let normalizer = TopicNormalizer::new(store, model.clone(), &config).unwrap();

        assert_eq!(normalizer.registry_len(), 2);
        assert_eq!(normalizer.cache_len(), 2);
        // Cached decisions answer without re-embedding
        assert_eq!(normalizer.normalize("login").unwrap(), "login");
        assert_eq!(model.calls(), 0);
    }

    #[test]
    fn test_canonical_topics_listing() {
        let (_dir, _model, normalizer) = harness(&[
            ("login", vec![1.0, 0.0]),
            ("payment failed", vec![0.0, 1.0]),
        ]);
        normalizer.normalize("login").unwrap();
        normalizer.normalize("payment failed").unwrap();

        assert_eq!(
            normalizer.canonical_topics(),
            vec!["login".to_string(), "payment failed".to_string()]
        );
    }

    #[test]
    fn test_invalid_threshold_rejected_at_construction() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("memory")).unwrap();
        let model = Arc::new(ScriptedModel::new(&[]));
        let config = NormalizerConfig {
            similarity_threshold: 2.0,
            ..NormalizerConfig::default()
        };
        assert!(TopicNormalizer::new(store, model, &config).is_err());
    }
}
