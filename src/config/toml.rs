//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Webhook target section
    #[serde(default)]
    pub webhook: WebhookSection,

    /// Transport limits section
    #[serde(default)]
    pub transport: TransportSection,

    /// Job policy section
    #[serde(default)]
    pub job: JobSection,
}

/// Webhook target section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookSection {
    /// Webhook address
    pub address: Option<String>,

    /// File holding the request body
    pub payload_file: Option<String>,

    /// Authorization header value
    pub auth_header: Option<String>,

    /// Selects the certificate-verifying transport when true
    #[serde(default)]
    pub skip_cert_verify: bool,
}

/// Transport limits section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransportSection {
    /// Overall request timeout in seconds (0 disables)
    pub timeout: Option<u64>,

    /// Connection timeout in seconds (0 disables)
    pub connect_timeout: Option<u64>,
}

/// Job policy section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobSection {
    /// Fixed retry budget, overriding the environment variable
    pub max_fails: Option<u32>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# webhook-job configuration file

[webhook]
# Webhook address (required unless given by --address or --params)
# address = "https://hooks.example.com/events"

# File holding the request body, sent verbatim as application/json
# payload_file = "event.json"

# Authorization header value, sent verbatim
# auth_header = "Bearer your-token-here"

# Historical name: true selects the transport that VERIFIES certificates,
# false (default) skips verification.
# skip_cert_verify = false

[transport]
# Overall request timeout in seconds, 0 disables (default: 30)
timeout = 30

# Connection timeout in seconds, 0 disables (default: 10)
connect_timeout = 10

[job]
# Fixed retry budget for the scheduler. When unset, the
# JOBSERVICE_WEBHOOK_JOB_MAX_RETRY environment variable is read
# (default: 10).
# max_fails = 10
"#
    .to_string()
}
