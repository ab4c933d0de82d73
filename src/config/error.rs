//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

use crate::job::ParameterError;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to read the payload file.
    #[error("Failed to read payload file '{}': {source}", path.display())]
    PayloadRead {
        /// Path to the payload file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to read or parse the job parameters file.
    #[error("Failed to load job parameters from '{}': {reason}", path.display())]
    ParamsFile {
        /// Path to the parameters file
        path: PathBuf,
        /// Reason for failure
        reason: String,
    },

    /// Missing required field that must be provided by CLI, config file,
    /// or parameters file.
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired {
        /// Name of the missing field
        field: &'static str,
        /// Hint for how to provide the value
        hint: &'static str,
    },

    /// A job parameter has the wrong type.
    #[error("Invalid job parameters: {0}")]
    InvalidParameter(#[from] ParameterError),

    /// Invalid URL provided.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The invalid URL string
        url: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Well-known field names for `MissingRequired` errors.
///
/// Use these constants for compile-time safety when matching field names.
pub mod field {
    /// The webhook address field.
    pub const ADDRESS: &str = "address";
    /// The payload field.
    pub const PAYLOAD: &str = "payload";
}

impl ConfigError {
    /// Creates a `MissingRequired` error for a required field.
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
