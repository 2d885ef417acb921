//! Error types for configuration loading.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadError {
        /// Path to the file that couldn't be read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML config {}: {source}", path.display())]
    TomlParseError {
        /// Path to the file that couldn't be parsed.
        path: PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// A policy value was not recognized.
    #[error("Invalid value for `{key}`: {source}")]
    InvalidPolicy {
        /// The offending config key.
        key: &'static str,
        /// The parse failure.
        #[source]
        source: ext_sort_copy::ParsePolicyError,
    },

    /// The no-extension bucket name cannot be used as a folder name.
    #[error("Invalid no-extension bucket name {0:?}: must be a single, non-empty folder name")]
    InvalidBucketName(String),
}
