//! Error types for pipeline configuration.

use std::io;

use thiserror::Error;

/// Errors that can occur when loading or validating a [`crate::PipelineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// A configured regex pattern failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern text that failed to compile.
        pattern: String,
        /// Underlying regex compile error.
        source: fancy_regex::Error,
    },

    /// A threshold or count was outside its valid range.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// The configuration key.
        field: &'static str,
        /// Why the value is invalid.
        reason: String,
    },
}
