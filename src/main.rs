//! webhook-job: deliver one event payload to a webhook endpoint.
//!
//! Entry point for the webhook-job application.

use std::process::ExitCode;

use webhook_job::config::{Cli, Command, ValidatedConfig, load_toml, write_default_config};
use webhook_job::job::DeliveryOutcome;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match &cli.command {
        Some(Command::Init { output }) => return handle_init(output),
        Some(Command::Policy) => return handle_policy(&cli),
        None => {}
    }

    // Load and validate configuration
    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    // Setup logging and run
    setup_tracing(config.verbose);
    tracing::info!("{config}");

    run_application(config)
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Handles the `policy` subcommand.
fn handle_policy(cli: &Cli) -> ExitCode {
    let toml = match load_toml(cli) {
        Ok(toml) => toml,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return exit_code::CONFIG_ERROR;
        }
    };

    let report = run::policy_report(ValidatedConfig::resolve_policy(cli, toml.as_ref()));
    match serde_json::to_string(&report) {
        Ok(json) => {
            println!("{json}");
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::runtime_error()
        }
    }
}

/// Runs one delivery attempt with the given configuration.
///
/// Excluded from coverage - requires async runtime.
#[cfg(not(tarpaulin_include))]
fn run_application(config: ValidatedConfig) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create Tokio runtime: {e}");
            return exit_code::runtime_error();
        }
    };

    match runtime.block_on(run::execute(config)) {
        Ok(outcome) => report_outcome(&outcome),
        Err(e @ run::RunError::Validation(_)) => {
            tracing::error!("{e}");
            exit_code::CONFIG_ERROR
        }
        Err(e) => {
            tracing::error!("Application error: {e}");
            exit_code::runtime_error()
        }
    }
}

/// Prints the outcome as JSON on stdout and maps it to an exit code.
fn report_outcome(outcome: &DeliveryOutcome) -> ExitCode {
    match serde_json::to_string(outcome) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Failed to serialize outcome: {e}"),
    }

    if outcome.is_success() {
        exit_code::SUCCESS
    } else {
        exit_code::delivery_failed()
    }
}
