//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::defaults;

/// webhook-job: deliver one event payload to a webhook endpoint
///
/// Makes a single POST attempt and reports the outcome. Retry scheduling
/// is left to the caller; `policy` prints the retry budget to honor.
#[derive(Debug, Parser)]
#[command(name = "webhook-job")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Webhook address to POST to
    #[arg(long)]
    pub address: Option<String>,

    /// Raw request body
    #[arg(long, conflicts_with = "payload_file")]
    pub payload: Option<String>,

    /// Read the request body from a file
    #[arg(long = "payload-file", value_name = "PATH")]
    pub payload_file: Option<PathBuf>,

    /// JSON object of job parameters, as a scheduler would supply them
    #[arg(long, value_name = "PATH")]
    pub params: Option<PathBuf>,

    /// Authorization header value, sent verbatim
    #[arg(long = "auth-header")]
    pub auth_header: Option<String>,

    /// Sets the `skip_cert_verify` job parameter, which selects the
    /// certificate-verifying transport
    #[arg(long = "skip-cert-verify")]
    pub skip_cert_verify: bool,

    /// Overall request timeout in seconds (0 disables)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Connection timeout in seconds (0 disables)
    #[arg(long = "connect-timeout")]
    pub connect_timeout: Option<u64>,

    /// Fixed retry budget, overriding the environment variable
    #[arg(long = "max-fails", global = true)]
    pub max_fails: Option<u32>,

    /// Job id used to correlate log output
    #[arg(long = "job-id")]
    pub job_id: Option<String>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for webhook-job
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE)]
        output: PathBuf,
    },

    /// Print the retry policy as JSON
    Policy,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
