//! webhook-job: scheduler job that delivers a serialized event payload to
//! a webhook endpoint.
//!
//! The [`job`] module holds the scheduler-facing contract and the
//! [`WebhookJob`](job::WebhookJob) itself; [`webhook`] holds the HTTP
//! layer it delivers through; [`config`] backs the command-line runner.

pub mod config;
pub mod job;
pub mod webhook;
