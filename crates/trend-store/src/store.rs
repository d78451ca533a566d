//! JSON file store with atomic replacement.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::StoreError;

/// File-backed store for named JSON collections.
///
/// Each collection lives at `<dir>/<collection>.json` as a pretty-printed
/// JSON object. Keys are stored in `BTreeMap` order, so the on-disk form is
/// deterministic and diffs cleanly.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The store's root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a collection file.
    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{}.json", collection))
    }

    /// Load a collection.
    ///
    /// A missing file or unparsable content yields an empty map; corruption
    /// is logged, not surfaced. Any other read failure propagates.
    pub fn load<T: DeserializeOwned>(
        &self,
        collection: &str,
    ) -> Result<BTreeMap<String, T>, StoreError> {
        let path = self.collection_path(collection);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(collection, "no persisted state, starting empty");
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str(&content) {
            Ok(map) => Ok(map),
            Err(e) => {
                warn!(
                    collection,
                    path = %path.display(),
                    error = %e,
                    "collection unparsable, treating as empty"
                );
                Ok(BTreeMap::new())
            }
        }
    }

    /// Persist a collection, replacing prior content atomically.
    ///
    /// The map is written to a temp file in the store directory and renamed
    /// over the destination, so readers never observe a truncated file.
    pub fn save<T: Serialize>(
        &self,
        collection: &str,
        map: &BTreeMap<String, T>,
    ) -> Result<(), StoreError> {
        let path = self.collection_path(collection);
        let json = serde_json::to_string_pretty(map)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| StoreError::Persist {
            collection: collection.to_string(),
            source: e.error,
        })?;

        debug!(collection, entries = map.len(), "collection saved");
        Ok(())
    }
}
