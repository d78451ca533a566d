//! Shared test harness for end-to-end tests.
//!
//! Provides a per-test temp directory tree (state, data, output) wired
//! into a [`TopicNormalizer`], plus a scripted embedding model so tests
//! control every similarity score exactly and can observe provider calls.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;

use trend_embeddings::{Embedding, EmbeddingError, EmbeddingModel, ModelInfo};
use trend_normalizer::TopicNormalizer;
use trend_store::JsonStore;
use trend_types::NormalizerConfig;

/// Embedding model serving pre-scripted vectors.
///
/// Counts calls and fails with `ProviderUnavailable` for any text it has
/// no vector for, which doubles as a provider-outage switch.
pub struct ScriptedEmbedder {
    info: ModelInfo,
    vectors: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
}

impl ScriptedEmbedder {
    /// Build from (text, vector) pairs.
    pub fn new(vectors: &[(&str, Vec<f32>)]) -> Self {
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

    /// How many embed calls the engine has made.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EmbeddingModel for ScriptedEmbedder {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.vectors
            .get(text)
            .map(|v| Embedding::new(v.clone()))
            .ok_or_else(|| {
                EmbeddingError::ProviderUnavailable(format!("no scripted vector for '{text}'"))
            })
    }
}

/// Temp directory tree plus the wiring for one test.
pub struct TestHarness {
    _tmp: TempDir,
    /// Normalizer state directory (registry + cache collections)
    pub state_dir: PathBuf,
    /// Daily review batch directory
    pub data_dir: PathBuf,
    /// Report output directory
    pub output_dir: PathBuf,
}

impl TestHarness {
    /// Create a fresh harness with empty directories.
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let state_dir = tmp.path().join("memory");
        let data_dir = tmp.path().join("data");
        let output_dir = tmp.path().join("output");
        std::fs::create_dir_all(&data_dir).expect("create data dir");
        Self {
            _tmp: tmp,
            state_dir,
            data_dir,
            output_dir,
        }
    }

    /// Build a normalizer over this harness's state directory.
    pub fn normalizer(&self, embedder: Arc<dyn EmbeddingModel>) -> TopicNormalizer {
        self.normalizer_with_config(embedder, &NormalizerConfig::default())
    }

    /// Build a normalizer with custom configuration.
    pub fn normalizer_with_config(
        &self,
        embedder: Arc<dyn EmbeddingModel>,
        config: &NormalizerConfig,
    ) -> TopicNormalizer {
        let store = JsonStore::open(&self.state_dir).expect("open store");
        TopicNormalizer::new(store, embedder, config).expect("build normalizer")
    }

    /// Write a daily review batch file from raw JSON.
    pub fn write_batch(&self, date: NaiveDate, json: &str) {
        let path = self.data_dir.join(format!("reviews_{}.json", date));
        std::fs::write(path, json).expect("write batch");
    }

    /// Path of a persisted normalizer collection.
    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.state_dir.join(format!("{}.json", collection))
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a `YYYY-MM-DD` date in tests.
pub fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid date literal")
}

/// Read a file to string, panicking with the path on failure.
pub fn read_file(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}
