//! Daily review batch loading.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::NaiveDate;
use tracing::debug;
use trend_types::Review;

use crate::error::PipelineError;

/// Load the review batch for one day from `<data_dir>/reviews_YYYY-MM-DD.json`.
///
/// A missing file means no feedback arrived that day and yields an empty
/// batch. A file that exists but does not parse is an error; the runner
/// decides whether to skip the day.
pub fn load_reviews(data_dir: &Path, date: NaiveDate) -> Result<Vec<Review>, PipelineError> {
    let path = data_dir.join(format!("reviews_{}.json", date));

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(%date, "no review batch for day");
            return Ok(Vec::new());
        }
        Err(e) => return Err(PipelineError::Io(e)),
    };

    serde_json::from_str(&content).map_err(|source| PipelineError::MalformedBatch { path, source })
}
