//! Application execution logic.
//!
//! Runs a single delivery attempt the way a scheduler would: validate,
//! run, and report the outcome, with Ctrl+C/SIGTERM cancelling the
//! attempt in flight.

use serde::Serialize;
use thiserror::Error;
use tokio::signal;

use webhook_job::config::ValidatedConfig;
use webhook_job::job::{
    CancelSignal, DeliveryOutcome, Job, JobContext, JobError, JobPolicy, ParameterError,
    WebhookJob,
};
use webhook_job::webhook::ClientFactory;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The job rejected its parameters.
    #[error("Job parameters rejected: {0}")]
    Validation(#[from] ParameterError),

    /// The job could not attempt delivery.
    #[error(transparent)]
    Job(#[from] JobError),
}

/// Retry policy as reported to a scheduler.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PolicyReport {
    /// Maximum failed attempts to tolerate
    pub max_fails: u32,
    /// Job-specific concurrency cap (0 = none)
    pub max_concurrency: u32,
    /// Whether failures may be retried
    pub should_retry: bool,
}

impl PolicyReport {
    /// Reads the policy accessors of a job.
    pub fn of(job: &impl Job) -> Self {
        Self {
            max_fails: job.max_fails(),
            max_concurrency: job.max_concurrency(),
            should_retry: job.should_retry(),
        }
    }
}

/// Builds the job described by the configuration.
pub fn build_job(config: &ValidatedConfig) -> WebhookJob {
    WebhookJob::new()
        .with_policy(config.policy.clone())
        .with_transport(config.transport)
        .with_eager_validation(true)
}

/// Returns the policy report for a retry policy.
pub fn policy_report(policy: JobPolicy) -> PolicyReport {
    PolicyReport::of(&WebhookJob::new().with_policy(policy))
}

/// Executes one delivery attempt.
///
/// # Errors
///
/// Returns an error if the job rejects its parameters or cannot set up
/// its transport. A failed delivery is `Ok` with a failure outcome.
///
/// # Coverage Note
///
/// Excluded from coverage because it installs OS signal handlers.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<DeliveryOutcome, RunError> {
    let job = build_job(&config);
    let (handle, cancel) = CancelSignal::pair();

    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::warn!("Shutdown signal received, cancelling delivery...");
        handle.cancel();
    });

    execute_job(&job, &config, cancel).await
}

/// Runs validate + run for a prepared job.
///
/// # Errors
///
/// See [`execute`].
pub async fn execute_job<F: ClientFactory>(
    job: &WebhookJob<F>,
    config: &ValidatedConfig,
    cancel: CancelSignal,
) -> Result<DeliveryOutcome, RunError> {
    tracing::debug!(
        max_fails = job.max_fails(),
        max_concurrency = job.max_concurrency(),
        should_retry = job.should_retry(),
        "Job policy"
    );

    job.validate(&config.params)?;

    let ctx = JobContext::new(config.job_id.clone()).with_cancel(cancel);
    let outcome = job.run(&ctx, &config.params).await?;

    Ok(outcome)
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
