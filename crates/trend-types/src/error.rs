//! Error types for configuration loading.

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration source could not be read or parsed
    #[error("Configuration error: {0}")]
    Load(String),

    /// Configuration value failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
