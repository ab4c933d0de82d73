//! Configuration layer for the `webhook-job` binary.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments**
//! 2. **TOML config file**
//! 3. **Parameters file** (`--params`), a JSON object in the same shape a
//!    scheduler hands to the job
//! 4. **Built-in defaults**
//!
//! `address` and `payload` have no default and must come from one of the
//! first three sources.
//!
//! # Boolean Flag Semantics
//!
//! `--skip-cert-verify` uses OR semantics: if set in either CLI or TOML the
//! `skip_cert_verify` parameter is `true`. When neither sets it, a value in
//! the parameters file is kept as is.
//!
//! # Retry Budget
//!
//! `--max-fails` or `job.max_fails` pins the budget. Otherwise it is read
//! from `JOBSERVICE_WEBHOOK_JOB_MAX_RETRY` every time it is asked for.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;


pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, load_params, load_toml, write_default_config};
