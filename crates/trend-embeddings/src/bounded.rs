//! Wall-clock bound around an embedding model.
//!
//! The normalization coordinator embeds inside its critical section, so a
//! provider that never answers would wedge the whole engine. This wrapper
//! runs each call on a worker thread and waits at most `timeout`; a late
//! answer is discarded.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::error::EmbeddingError;
use crate::model::{Embedding, EmbeddingModel, ModelInfo};

/// Embedding model wrapper that enforces a per-call timeout.
pub struct BoundedEmbedder {
    inner: Arc<dyn EmbeddingModel>,
    timeout: Duration,
}

impl BoundedEmbedder {
    /// Wrap a model with a per-call timeout.
    pub fn new(inner: Arc<dyn EmbeddingModel>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl EmbeddingModel for BoundedEmbedder {
    fn info(&self) -> &ModelInfo {
        self.inner.info()
    }

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let (tx, rx) = mpsc::channel();
        let model = Arc::clone(&self.inner);
        let owned = text.to_string();

        // Detached worker: if it outlives the deadline its result is
        // dropped along with the channel.
        thread::spawn(move || {
            let result = model.embed(&owned);
            let _ = tx.send(result);
        });

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                let waited_ms = self.timeout.as_millis() as u64;
                warn!(waited_ms, "embedding call timed out");
                Err(EmbeddingError::Timeout { waited_ms })
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EmbeddingError::ProviderUnavailable(
                "embedding worker terminated without a result".to_string(),
            )),
        }
    }
}
