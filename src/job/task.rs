//! The contract between a job and the scheduler that runs it.

use thiserror::Error;

use super::{DeliveryOutcome, JobContext, JobParameters, ParameterError};
use crate::webhook::HttpError;

/// Hard job failure: the job could not even attempt its work.
///
/// Ordinary delivery failures are not errors; they are reported as
/// [`DeliveryOutcome::Failure`].
#[derive(Debug, Error)]
pub enum JobError {
    /// The HTTP transport could not be set up.
    #[error("Failed to initialize webhook job: {0}")]
    Initialization(#[source] HttpError),
}

/// A schedulable unit of work.
///
/// The scheduler reads the policy accessors to drive its own retry and
/// concurrency bookkeeping, calls [`Job::validate`] at enqueue time, and
/// [`Job::run`] once per attempt.
pub trait Job: Send + Sync {
    /// Maximum number of failed attempts before the scheduler gives up.
    fn max_fails(&self) -> u32;

    /// Job-specific concurrency cap; 0 means no cap.
    fn max_concurrency(&self) -> u32;

    /// Whether failed attempts may be retried at all.
    fn should_retry(&self) -> bool;

    /// Checks parameters before the job is enqueued.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError`] if the parameters are rejected.
    fn validate(&self, params: &JobParameters) -> Result<(), ParameterError>;

    /// Performs one attempt.
    ///
    /// # Errors
    ///
    /// Returns [`JobError`] only when the attempt could not be made;
    /// the attempt's own result is the returned outcome.
    fn run(
        &self,
        ctx: &JobContext,
        params: &JobParameters,
    ) -> impl std::future::Future<Output = Result<DeliveryOutcome, JobError>> + Send;
}
