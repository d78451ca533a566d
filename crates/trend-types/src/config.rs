//! Configuration loading for the feedback trend system.
//!
//! Layered sources, later overrides earlier:
//! 1. Built-in defaults
//! 2. Config file (~/.config/feedback-trends/config.toml)
//! 3. Caller-specified config file
//! 4. Environment variables (TREND_*)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Default log filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Topic normalization settings
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    /// Keyword extraction settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Pipeline runner settings
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            normalizer: NormalizerConfig::default(),
            extractor: ExtractorConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl TrendConfig {
    /// Load configuration from the layered sources.
    ///
    /// The default config file is optional; a caller-specified file must
    /// exist. Malformed content in either is a [`ConfigError::Load`].
    pub fn load(cli_config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_dir = ProjectDirs::from("", "", "feedback-trends")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(&path.to_string_lossy()).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("TREND")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        let loaded: TrendConfig = config
            .try_deserialize()
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Validate all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.normalizer.validate()?;
        self.extractor.validate()?;
        self.pipeline.validate()
    }
}

/// Topic normalization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Minimum cosine similarity for a raw topic to be treated as an
    /// alias of an existing canonical topic (inclusive).
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Maximum time to wait for one embedding call (ms).
    #[serde(default = "default_embed_timeout_ms")]
    pub embed_timeout_ms: u64,

    /// Directory holding the topic registry and cache collections.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            embed_timeout_ms: default_embed_timeout_ms(),
            state_dir: default_state_dir(),
        }
    }
}

impl NormalizerConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::Invalid(format!(
                "similarity_threshold must be 0.0-1.0, got {}",
                self.similarity_threshold
            )));
        }
        if self.embed_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "embed_timeout_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_similarity_threshold() -> f32 {
    0.75
}
fn default_embed_timeout_ms() -> u64 {
    5000
}
fn default_state_dir() -> PathBuf {
    PathBuf::from("memory")
}

/// Keyword extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Keywords matched case-insensitively against review text,
    /// checked in list order.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// Topic assigned when no keyword matches.
    #[serde(default = "default_fallback_topic")]
    pub fallback_topic: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            fallback_topic: default_fallback_topic(),
        }
    }
}

impl ExtractorConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keywords.is_empty() {
            return Err(ConfigError::Invalid(
                "keywords must not be empty".to_string(),
            ));
        }
        if self.fallback_topic.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "fallback_topic must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_keywords() -> Vec<String> {
    [
        "login",
        "authentication",
        "payment",
        "crash",
        "slow",
        "ui",
        "performance",
        "bug",
        "error",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect()
}

fn default_fallback_topic() -> String {
    "general feedback".to_string()
}

/// Pipeline runner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory containing daily review batch files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory trend reports are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Rolling window length in days, inclusive of the target date.
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
            window_days: default_window_days(),
        }
    }
}

impl PipelineConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_days == 0 {
            return Err(ConfigError::Invalid(
                "window_days must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}
fn default_window_days() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrendConfig::default();
        assert_eq!(config.normalizer.similarity_threshold, 0.75);
        assert_eq!(config.normalizer.embed_timeout_ms, 5000);
        assert_eq!(config.pipeline.window_days, 30);
        assert_eq!(config.extractor.fallback_topic, "general feedback");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let mut config = NormalizerConfig::default();
        config.similarity_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = NormalizerConfig::default();
        config.embed_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_keywords_rejected() {
        let config = ExtractorConfig {
            keywords: Vec::new(),
            fallback_topic: "general feedback".to_string(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "log_level = \"debug\"\n[normalizer]\nsimilarity_threshold = 0.8\n",
        )
        .unwrap();

        let config = TrendConfig::load(Some(&path)).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.normalizer.similarity_threshold, 0.8);
        // Untouched sections keep defaults
        assert_eq!(config.pipeline.window_days, 30);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let result = TrendConfig::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
    }
}
