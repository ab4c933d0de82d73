//! Job layer: the scheduler-facing contract and the webhook delivery job.
//!
//! This module provides:
//! - The job contract ([`Job`], [`JobError`])
//! - Per-invocation context with cancellation ([`JobContext`], [`CancelSignal`])
//! - Parameter handling ([`JobParameters`], [`WebhookParams`])
//! - Retry policy ([`JobPolicy`])
//! - Attempt results ([`DeliveryOutcome`])
//! - The webhook job itself ([`WebhookJob`])
//!
//! # Lifecycle
//!
//! For one attempt the scheduler calls `validate` and then `run`. `run`
//! builds a client (`init`), sends the request (`execute`) and classifies
//! the response:
//!
//! ```text
//! Created -> Initializing -> Executing -> { Success | Failure | InitError } -> Done
//! ```
//!
//! Only `InitError` is returned as `Err`. `Success` and `Failure` are both
//! `Ok(DeliveryOutcome)`; a failure is additionally logged at error level.

mod context;
mod outcome;
pub mod params;
mod policy;
mod task;
mod webhook_job;

#[cfg(test)]
mod webhook_job_tests;

pub use context::{CancelHandle, CancelSignal, JobContext};
pub use outcome::DeliveryOutcome;
pub use params::{JobParameters, ParameterError, WebhookParams};
pub use policy::{
    DEFAULT_MAX_FAILS, EnvSource, JobPolicy, MAX_FAILS_ENV, MaxFailsSource, ProcessEnv,
    parse_max_fails,
};
pub use task::{Job, JobError};
pub use webhook_job::{TransportSettings, WebhookJob};
