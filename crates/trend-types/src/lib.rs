//! # trend-types
//!
//! Shared types and configuration for the feedback trend analysis system.
//!
//! This crate holds the review record loaded from daily batch files and the
//! layered configuration consumed by the extractor, the topic normalizer,
//! and the pipeline runner.

pub mod config;
pub mod error;
pub mod review;

pub use config::{ExtractorConfig, NormalizerConfig, PipelineConfig, TrendConfig};
pub use error::ConfigError;
pub use review::Review;
