//! Pipeline error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by review loading and report writing.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// I/O failure other than a missing batch file
    #[error("Pipeline I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A batch file exists but is not valid JSON
    #[error("Malformed review batch {path}: {source}")]
    MalformedBatch {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Atomic replacement of the report file failed
    #[error("Failed to write trend report {path}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
