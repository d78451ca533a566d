//! # trend-pipeline
//!
//! The batch pipeline around the topic normalization engine: loads daily
//! review batches for a rolling window, extracts raw topics, normalizes
//! them to canonical labels, and writes a topic-by-date trend table.
//!
//! Failure isolation is per item: one review whose topic cannot be
//! normalized (provider down, store failure) is logged and skipped; the
//! run continues.

pub mod aggregate;
pub mod error;
pub mod reviews;
pub mod runner;

pub use aggregate::DailyTopicCounts;
pub use error::PipelineError;
pub use reviews::load_reviews;
pub use runner::{run_pipeline, PipelineSummary};
