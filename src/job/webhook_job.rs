//! The webhook delivery job.

use std::time::{Duration, Instant};

use tracing::Instrument;

use super::params::{self, WebhookParams};
use super::{DeliveryOutcome, Job, JobContext, JobError, JobParameters, JobPolicy, ParameterError};
use crate::webhook::{
    ClientFactory, DeliveryError, HttpResponse, ReqwestFactory, TransportConfig, deliver,
};

/// Timeouts applied to the transport of every attempt.
///
/// `None` leaves the limit to the underlying transport, which for the
/// overall request means no limit at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportSettings {
    /// Overall request timeout
    pub timeout: Option<Duration>,
    /// Connection establishment timeout
    pub connect_timeout: Option<Duration>,
}

/// Delivers a serialized event payload to a webhook endpoint.
///
/// Each call to [`Job::run`] makes exactly one POST attempt with a freshly
/// built client and reports the classified result. Retry eligibility is
/// communicated through the policy accessors, never through `run`'s error.
///
/// # Parameters
///
/// | key                | type   | required | meaning |
/// |--------------------|--------|----------|---------|
/// | `payload`          | string | yes      | request body, sent verbatim |
/// | `address`          | string | yes      | target URL |
/// | `skip_cert_verify` | bool   | no       | `true` selects the certificate-**verifying** transport |
/// | `auth_header`      | string | no       | `Authorization` value when non-empty |
///
/// # Type Parameters
///
/// - `F`: builds the HTTP client for each attempt (defaults to [`ReqwestFactory`])
///
/// # Example
///
/// ```no_run
/// use webhook_job::job::{Job, JobContext, JobParameters, WebhookJob};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let job = WebhookJob::new();
/// let params = JobParameters::new()
///     .with("payload", r#"{"event":"push"}"#)
///     .with("address", "https://hooks.example.com/events");
///
/// let outcome = job.run(&JobContext::new("job-1"), &params).await?;
/// println!("delivered: {}", outcome.is_success());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WebhookJob<F = ReqwestFactory> {
    factory: F,
    policy: JobPolicy,
    transport: TransportSettings,
    eager_validation: bool,
}

impl WebhookJob<ReqwestFactory> {
    /// Creates a job using reqwest, the process environment for its retry
    /// budget, no explicit timeouts, and lenient validation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factory: ReqwestFactory,
            policy: JobPolicy::from_env(),
            transport: TransportSettings::default(),
            eager_validation: false,
        }
    }
}

impl Default for WebhookJob<ReqwestFactory> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> WebhookJob<F> {
    /// Replaces the client factory.
    #[must_use]
    pub fn with_factory<F2>(self, factory: F2) -> WebhookJob<F2> {
        WebhookJob {
            factory,
            policy: self.policy,
            transport: self.transport,
            eager_validation: self.eager_validation,
        }
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_policy(mut self, policy: JobPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the transport timeouts.
    #[must_use]
    pub const fn with_transport(mut self, transport: TransportSettings) -> Self {
        self.transport = transport;
        self
    }

    /// Makes [`Job::validate`] check the parameters instead of accepting
    /// everything and deferring the check to execution.
    #[must_use]
    pub const fn with_eager_validation(mut self, enabled: bool) -> Self {
        self.eager_validation = enabled;
        self
    }

    /// Returns the transport timeouts.
    #[must_use]
    pub const fn transport(&self) -> TransportSettings {
        self.transport
    }
}

impl<F: ClientFactory> WebhookJob<F> {
    /// Selects the transport from the parameters and builds the client.
    fn init(&self, params: &JobParameters) -> Result<F::Client, JobError> {
        let transport = TransportConfig {
            tls: params::tls_mode(params),
            timeout: self.transport.timeout,
            connect_timeout: self.transport.connect_timeout,
        };
        tracing::debug!(tls = %transport.tls, "Selected webhook transport");

        self.factory
            .build(&transport)
            .map_err(JobError::Initialization)
    }

    /// Makes the delivery attempt, aborting it if the context is cancelled.
    async fn execute(
        &self,
        client: &F::Client,
        ctx: &JobContext,
        params: &JobParameters,
    ) -> Result<HttpResponse, DeliveryError> {
        let target = WebhookParams::from_parameters(params)?.into_target();
        let cancel = ctx.cancel_signal();

        tokio::select! {
            biased;

            () = cancel.cancelled() => Err(DeliveryError::Cancelled {
                address: target.address().to_owned(),
            }),

            result = deliver(client, &target) => result,
        }
    }

    async fn attempt(
        &self,
        ctx: &JobContext,
        params: &JobParameters,
    ) -> Result<DeliveryOutcome, JobError> {
        let client = self.init(params)?;

        let started = Instant::now();
        let outcome = match self.execute(&client, ctx, params).await {
            Ok(response) => {
                tracing::info!(
                    status = response.status.as_u16(),
                    "Webhook delivered ({} response bytes released)",
                    response.body_len
                );
                DeliveryOutcome::Success {
                    status: response.status.as_u16(),
                    elapsed: started.elapsed(),
                }
            }
            Err(e) => {
                // Delivery failures are reported, not propagated.
                tracing::error!("{e}");
                DeliveryOutcome::failure(&e)
            }
        };

        Ok(outcome)
    }
}

impl<F: ClientFactory> Job for WebhookJob<F> {
    fn max_fails(&self) -> u32 {
        self.policy.max_fails()
    }

    fn max_concurrency(&self) -> u32 {
        0
    }

    fn should_retry(&self) -> bool {
        true
    }

    fn validate(&self, params: &JobParameters) -> Result<(), ParameterError> {
        if self.eager_validation {
            WebhookParams::from_parameters(params)?;
        }
        Ok(())
    }

    async fn run(
        &self,
        ctx: &JobContext,
        params: &JobParameters,
    ) -> Result<DeliveryOutcome, JobError> {
        self.attempt(ctx, params).instrument(ctx.span()).await
    }
}
