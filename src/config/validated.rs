//! Validated configuration after merging CLI, TOML, and parameter-file
//! sources.
//!
//! This module contains the final, validated configuration that is used
//! by the binary. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::job::params::key;
use crate::job::{JobParameters, JobPolicy, TransportSettings, WebhookParams};

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration for one delivery attempt.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args, an optional
/// TOML config, and an optional parameter bag.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Job id for log correlation
    pub job_id: String,

    /// Parameters handed to the job
    pub params: JobParameters,

    /// Transport timeouts
    pub transport: TransportSettings,

    /// Retry policy reported to the scheduler
    pub policy: JobPolicy,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let address = self
            .params
            .get(key::ADDRESS)
            .and_then(|v| v.as_str())
            .unwrap_or("none");
        let secs = |d: Option<std::time::Duration>| {
            d.map_or_else(|| "none".to_string(), |d| format!("{}s", d.as_secs()))
        };

        write!(
            f,
            "Config {{ job_id: {}, address: {}, tls: {}, auth_header: {}, timeout: {}, \
             connect_timeout: {}, max_fails: {} }}",
            self.job_id,
            address,
            crate::job::params::tls_mode(&self.params),
            if self.params.contains(key::AUTH_HEADER) {
                "set"
            } else {
                "none"
            },
            secs(self.transport.timeout),
            secs(self.transport.connect_timeout),
            self.policy.max_fails(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from its sources.
    ///
    /// Priority for every field: explicit CLI > TOML > parameter bag >
    /// built-in default.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `address` or `payload` is provided by no source
    /// - The payload file cannot be read
    /// - A parameter has the wrong type
    /// - The address is not a valid URL
    pub fn from_raw(
        cli: &Cli,
        toml: Option<&TomlConfig>,
        params: Option<JobParameters>,
    ) -> Result<Self, ConfigError> {
        let mut params = params.unwrap_or_default();

        Self::resolve_address(cli, toml, &mut params)?;
        Self::resolve_payload(cli, toml, &mut params)?;
        Self::resolve_auth_header(cli, toml, &mut params);

        // Flags only enable: set in either CLI or TOML wins.
        if cli.skip_cert_verify || toml.is_some_and(|t| t.webhook.skip_cert_verify) {
            params.insert(key::SKIP_CERT_VERIFY, true);
        }

        // Type-check the bag eagerly so the attempt cannot fail on it.
        let webhook = WebhookParams::from_parameters(&params)?;
        Url::parse(&webhook.address).map_err(|e| ConfigError::InvalidUrl {
            url: webhook.address.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            job_id: cli
                .job_id
                .clone()
                .unwrap_or_else(|| defaults::JOB_ID.to_string()),
            params,
            transport: Self::resolve_transport(cli, toml),
            policy: Self::resolve_policy(cli, toml),
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI, the optional config file,
    /// and the optional parameters file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config or parameters file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = load_toml(cli)?;
        let params = cli.params.as_deref().map(load_params).transpose()?;

        Self::from_raw(cli, toml.as_ref(), params)
    }

    fn resolve_address(
        cli: &Cli,
        toml: Option<&TomlConfig>,
        params: &mut JobParameters,
    ) -> Result<(), ConfigError> {
        let address = cli
            .address
            .clone()
            .or_else(|| toml.and_then(|t| t.webhook.address.clone()));

        if let Some(address) = address {
            params.insert(key::ADDRESS, address);
        } else if !params.contains(key::ADDRESS) {
            return Err(ConfigError::missing(
                field::ADDRESS,
                "Use --address, set webhook.address in config file, or pass it in --params",
            ));
        }

        Ok(())
    }

    fn resolve_payload(
        cli: &Cli,
        toml: Option<&TomlConfig>,
        params: &mut JobParameters,
    ) -> Result<(), ConfigError> {
        if let Some(ref payload) = cli.payload {
            params.insert(key::PAYLOAD, payload.clone());
            return Ok(());
        }

        let file = cli.payload_file.clone().or_else(|| {
            toml.and_then(|t| t.webhook.payload_file.as_ref().map(PathBuf::from))
        });

        if let Some(path) = file {
            let payload = std::fs::read_to_string(&path)
                .map_err(|source| ConfigError::PayloadRead { path, source })?;
            params.insert(key::PAYLOAD, payload);
        } else if !params.contains(key::PAYLOAD) {
            return Err(ConfigError::missing(
                field::PAYLOAD,
                "Use --payload or --payload-file, set webhook.payload_file in config file, \
                 or pass it in --params",
            ));
        }

        Ok(())
    }

    fn resolve_auth_header(cli: &Cli, toml: Option<&TomlConfig>, params: &mut JobParameters) {
        let auth = cli
            .auth_header
            .clone()
            .or_else(|| toml.and_then(|t| t.webhook.auth_header.clone()));

        if let Some(auth) = auth {
            params.insert(key::AUTH_HEADER, auth);
        }
    }

    fn resolve_transport(cli: &Cli, toml: Option<&TomlConfig>) -> TransportSettings {
        let transport = toml.map(|t| &t.transport);

        let timeout = cli
            .timeout
            .or_else(|| transport.and_then(|t| t.timeout))
            .unwrap_or(defaults::TIMEOUT_SECS);

        let connect_timeout = cli
            .connect_timeout
            .or_else(|| transport.and_then(|t| t.connect_timeout))
            .unwrap_or(defaults::CONNECT_TIMEOUT_SECS);

        TransportSettings {
            timeout: defaults::limit(timeout),
            connect_timeout: defaults::limit(connect_timeout),
        }
    }

    /// Resolves the retry policy: a fixed budget from CLI or TOML, else the
    /// environment variable read on every call.
    #[must_use]
    pub fn resolve_policy(cli: &Cli, toml: Option<&TomlConfig>) -> JobPolicy {
        cli.max_fails
            .or_else(|| toml.and_then(|t| t.job.max_fails))
            .map_or_else(JobPolicy::from_env, JobPolicy::fixed)
    }
}

/// Loads the TOML file named by `--config`, if any.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_toml(cli: &Cli) -> Result<Option<TomlConfig>, ConfigError> {
    cli.config.as_deref().map(TomlConfig::load).transpose()
}

/// Loads a JSON parameter bag from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON object.
pub fn load_params(path: &Path) -> Result<JobParameters, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ParamsFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    JobParameters::from_json(&content).map_err(|e| ConfigError::ParamsFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
