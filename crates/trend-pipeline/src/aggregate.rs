//! Trend aggregation and report writing.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::PipelineError;

/// Per-day canonical topic counts for one reporting window.
///
/// Both levels are `BTreeMap`s so the report is deterministic: dates in
/// chronological order, topics in lexicographic order.
#[derive(Debug, Default)]
pub struct DailyTopicCounts {
    counts: BTreeMap<NaiveDate, BTreeMap<String, u64>>,
}

impl DailyTopicCounts {
    /// Create an empty aggregation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure a day appears in the report even with zero counts.
    pub fn ensure_date(&mut self, date: NaiveDate) {
        self.counts.entry(date).or_default();
    }

    /// Count one occurrence of a canonical topic on a day.
    pub fn record(&mut self, date: NaiveDate, topic: impl Into<String>) {
        *self
            .counts
            .entry(date)
            .or_default()
            .entry(topic.into())
            .or_insert(0) += 1;
    }

    /// Count for one topic on one day (0 when absent).
    pub fn count(&self, date: NaiveDate, topic: &str) -> u64 {
        self.counts
            .get(&date)
            .and_then(|day| day.get(topic))
            .copied()
            .unwrap_or(0)
    }

    /// All dates in the window, in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.counts.keys().copied().collect()
    }

    /// All topics that occurred, sorted.
    pub fn topics(&self) -> Vec<String> {
        let set: BTreeSet<&String> = self.counts.values().flat_map(|day| day.keys()).collect();
        set.into_iter().cloned().collect()
    }

    /// True when no topic was recorded at all.
    pub fn is_empty(&self) -> bool {
        self.counts.values().all(|day| day.is_empty())
    }

    /// Write the trend table as CSV: one row per canonical topic, one
    /// column per day, zero-filled. Written atomically to
    /// `<output_dir>/trend_report_<target>.csv`.
    pub fn write_trend_table(
        &self,
        output_dir: &Path,
        target: NaiveDate,
    ) -> Result<PathBuf, PipelineError> {
        std::fs::create_dir_all(output_dir)?;
        let path = output_dir.join(format!("trend_report_{}.csv", target));

        let dates = self.dates();
        let mut out = String::from("topic");
        for date in &dates {
            out.push(',');
            out.push_str(&date.to_string());
        }
        out.push('\n');

        for topic in self.topics() {
            out.push_str(&csv_field(&topic));
            for date in &dates {
                out.push(',');
                out.push_str(&self.count(*date, &topic).to_string());
            }
            out.push('\n');
        }

        let mut tmp = NamedTempFile::new_in(output_dir)?;
        tmp.write_all(out.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| PipelineError::Report {
            path: path.clone(),
            source: e.error,
        })?;

        info!(path = %path.display(), topics = self.topics().len(), "trend report written");
        Ok(path)
    }
}

/// Quote a CSV field only when it needs it.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
