//! Pipeline runner.
//!
//! Walks the rolling window ending at the target date, feeding each
//! review through extraction and normalization into the daily counts.

use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use tracing::{info, warn};
use trend_extract::KeywordExtractor;
use trend_normalizer::TopicNormalizer;
use trend_types::PipelineConfig;

use crate::aggregate::DailyTopicCounts;
use crate::error::PipelineError;
use crate::reviews::load_reviews;

/// Outcome of one pipeline run.
#[derive(Debug)]
pub struct PipelineSummary {
    /// Reviews processed across the window
    pub reviews: usize,
    /// Raw topics successfully normalized and counted
    pub normalized: usize,
    /// Items skipped: failed normalizations plus unreadable batches
    pub failures: usize,
    /// Where the trend report was written
    pub report_path: PathBuf,
}

/// Run the trend pipeline for the window ending at `target` (inclusive).
///
/// A malformed batch file skips that day's batch; a failed normalization
/// skips that one raw topic. Both are logged and counted in the summary,
/// and the run continues. Only report writing and unexpected I/O abort
/// the run.
pub fn run_pipeline(
    normalizer: &TopicNormalizer,
    extractor: &KeywordExtractor,
    config: &PipelineConfig,
    target: NaiveDate,
) -> Result<PipelineSummary, PipelineError> {
    let mut counts = DailyTopicCounts::new();
    let mut reviews_seen = 0usize;
    let mut normalized = 0usize;
    let mut failures = 0usize;

    for offset in (0..=i64::from(config.window_days)).rev() {
        let day = target - Duration::days(offset);
        counts.ensure_date(day);

        let reviews = match load_reviews(&config.data_dir, day) {
            Ok(reviews) => reviews,
            Err(PipelineError::MalformedBatch { path, source }) => {
                warn!(path = %path.display(), error = %source, "skipping unreadable batch");
                failures += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        for review in &reviews {
            reviews_seen += 1;
            for raw_topic in extractor.extract(&review.text) {
                match normalizer.normalize(&raw_topic) {
                    Ok(canonical) => {
                        counts.record(day, canonical);
                        normalized += 1;
                    }
                    Err(e) => {
                        warn!(%raw_topic, error = %e, "skipping topic, normalization failed");
                        failures += 1;
                    }
                }
            }
        }
    }

    let report_path = counts.write_trend_table(&config.output_dir, target)?;
    info!(
        reviews = reviews_seen,
        normalized,
        failures,
        canonical_topics = normalizer.registry_len(),
        "pipeline run complete"
    );

    Ok(PipelineSummary {
        reviews: reviews_seen,
        normalized,
        failures,
        report_path,
    })
}
