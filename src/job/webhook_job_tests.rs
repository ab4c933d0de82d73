//! Tests for `WebhookJob`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::params::key;
use super::{
    CancelSignal, DeliveryOutcome, Job, JobContext, JobError, JobParameters, JobPolicy,
    MAX_FAILS_ENV, ParameterError, TransportSettings, WebhookJob,
};
use crate::webhook::{
    ClientFactory, HttpClient, HttpError, HttpRequest, HttpResponse, TlsMode, TransportConfig,
};

const ADDRESS: &str = "https://hooks.example.com/events";

/// How the mock client answers.
#[derive(Debug, Clone, Copy)]
enum Reply {
    Status(u16),
    Refuse,
    Hang,
}

/// Mock client that records every request it is asked to send.
#[derive(Debug)]
struct MockClient {
    reply: Reply,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(req);
        match self.reply {
            Reply::Status(code) => Ok(HttpResponse::new(
                http::StatusCode::from_u16(code).unwrap(),
                0,
            )),
            Reply::Refuse => Err(HttpError::Connection(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))),
            Reply::Hang => std::future::pending().await,
        }
    }
}

/// Mock factory that records the transports it was asked to build.
#[derive(Debug, Clone)]
struct MockFactory {
    reply: Reply,
    fail_build: bool,
    transports: Arc<Mutex<Vec<TransportConfig>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockFactory {
    fn new(reply: Reply) -> Self {
        Self {
            reply,
            fail_build: false,
            transports: Arc::default(),
            requests: Arc::default(),
        }
    }

    fn failing() -> Self {
        Self {
            fail_build: true,
            ..Self::new(Reply::Status(200))
        }
    }

    fn transports(&self) -> Vec<TransportConfig> {
        self.transports.lock().unwrap().clone()
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ClientFactory for MockFactory {
    type Client = MockClient;

    fn build(&self, transport: &TransportConfig) -> Result<MockClient, HttpError> {
        self.transports.lock().unwrap().push(*transport);
        if self.fail_build {
            return Err(HttpError::Build("no TLS backend".to_string()));
        }
        Ok(MockClient {
            reply: self.reply,
            requests: self.requests.clone(),
        })
    }
}

fn job(factory: &MockFactory) -> WebhookJob<MockFactory> {
    WebhookJob::new().with_factory(factory.clone())
}

fn params() -> JobParameters {
    JobParameters::new()
        .with(key::PAYLOAD, r#"{"a":1}"#)
        .with(key::ADDRESS, ADDRESS)
}

fn ctx() -> JobContext {
    JobContext::new("job-1")
}

mod policy_accessors {
    use super::*;

    #[test]
    fn max_fails_defaults_to_ten_without_configuration() {
        let job = WebhookJob::new().with_policy(JobPolicy::with_env(HashMap::new()));
        assert_eq!(job.max_fails(), 10);
    }

    #[test]
    fn max_fails_reads_configured_value() {
        let env = HashMap::from([(MAX_FAILS_ENV.to_string(), "3".to_string())]);
        let job = WebhookJob::new().with_policy(JobPolicy::with_env(env));

        assert_eq!(job.max_fails(), 3);
    }

    #[test]
    fn max_fails_ignores_unparseable_value() {
        let env = HashMap::from([(MAX_FAILS_ENV.to_string(), "lots".to_string())]);
        let job = WebhookJob::new().with_policy(JobPolicy::with_env(env));

        assert_eq!(job.max_fails(), 10);
    }

    #[test]
    fn no_concurrency_cap_and_always_retry() {
        let job = WebhookJob::new();

        assert_eq!(job.max_concurrency(), 0);
        assert!(job.should_retry());
    }
}

mod validation {
    use super::*;

    #[test]
    fn default_validation_accepts_anything() {
        let job = WebhookJob::new();

        assert!(job.validate(&JobParameters::new()).is_ok());
        assert!(job.validate(&params().with(key::ADDRESS, 1)).is_ok());
        assert!(job.validate(&params()).is_ok());
    }

    #[test]
    fn eager_validation_rejects_missing_payload() {
        let job = WebhookJob::new().with_eager_validation(true);
        let params = JobParameters::new().with(key::ADDRESS, ADDRESS);

        assert_eq!(
            job.validate(&params),
            Err(ParameterError::Missing { key: "payload" })
        );
    }

    #[test]
    fn eager_validation_accepts_valid_parameters() {
        let job = WebhookJob::new().with_eager_validation(true);
        assert!(job.validate(&params()).is_ok());
    }
}

mod transport_selection {
    use super::*;

    #[tokio::test]
    async fn absent_flag_selects_skip_verify() {
        let factory = MockFactory::new(Reply::Status(200));
        job(&factory).run(&ctx(), &params()).await.unwrap();

        assert_eq!(factory.transports()[0].tls, TlsMode::SkipVerify);
    }

    #[tokio::test]
    async fn false_flag_selects_skip_verify() {
        let factory = MockFactory::new(Reply::Status(200));
        let params = params().with(key::SKIP_CERT_VERIFY, false);
        job(&factory).run(&ctx(), &params).await.unwrap();

        assert_eq!(factory.transports()[0].tls, TlsMode::SkipVerify);
    }

    #[tokio::test]
    async fn true_flag_selects_verify() {
        let factory = MockFactory::new(Reply::Status(200));
        let params = params().with(key::SKIP_CERT_VERIFY, true);
        job(&factory).run(&ctx(), &params).await.unwrap();

        assert_eq!(factory.transports()[0].tls, TlsMode::Verify);
    }

    #[tokio::test]
    async fn timeouts_come_from_job_settings() {
        let factory = MockFactory::new(Reply::Status(200));
        let settings = TransportSettings {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(5)),
        };
        job(&factory)
            .with_transport(settings)
            .run(&ctx(), &params())
            .await
            .unwrap();

        let transport = factory.transports()[0];
        assert_eq!(transport.timeout, Some(Duration::from_secs(30)));
        assert_eq!(transport.connect_timeout, Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn every_run_builds_a_new_client() {
        let factory = MockFactory::new(Reply::Status(200));
        let job = job(&factory);

        job.run(&ctx(), &params()).await.unwrap();
        job.run(&ctx(), &params()).await.unwrap();

        assert_eq!(factory.transports().len(), 2);
    }
}

mod run {
    use super::*;

    #[tokio::test]
    async fn success_status_is_success_outcome() {
        let factory = MockFactory::new(Reply::Status(202));

        let outcome = job(&factory).run(&ctx(), &params()).await.unwrap();

        assert!(matches!(outcome, DeliveryOutcome::Success { status: 202, .. }));
    }

    #[tokio::test]
    async fn sends_payload_headers_and_auth() {
        let factory = MockFactory::new(Reply::Status(200));
        let params = params().with(key::AUTH_HEADER, "Bearer xyz");

        job(&factory).run(&ctx(), &params).await.unwrap();

        let request = &factory.requests()[0];
        assert_eq!(request.method, http::Method::POST);
        assert_eq!(request.url.as_str(), ADDRESS);
        assert_eq!(request.body, br#"{"a":1}"#.to_vec());
        assert_eq!(
            request.headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(
            request.headers.get(http::header::AUTHORIZATION).unwrap(),
            "Bearer xyz"
        );
    }

    #[tokio::test]
    async fn empty_auth_header_is_not_sent() {
        let factory = MockFactory::new(Reply::Status(200));
        let params = params().with(key::AUTH_HEADER, "");

        job(&factory).run(&ctx(), &params).await.unwrap();

        assert!(
            !factory.requests()[0]
                .headers
                .contains_key(http::header::AUTHORIZATION)
        );
    }

    #[tokio::test]
    async fn not_found_is_swallowed_as_failure() {
        let factory = MockFactory::new(Reply::Status(404));

        let outcome = job(&factory).run(&ctx(), &params()).await.unwrap();

        let cause = outcome.cause().unwrap();
        assert!(cause.contains(ADDRESS));
        assert!(cause.contains("404"));
    }

    #[tokio::test]
    async fn connection_refused_is_swallowed_as_failure() {
        let factory = MockFactory::new(Reply::Refuse);

        let outcome = job(&factory).run(&ctx(), &params()).await.unwrap();

        assert!(!outcome.is_success());
        assert!(matches!(outcome, DeliveryOutcome::Failure { status: None, .. }));
    }

    #[tokio::test]
    async fn missing_parameters_are_failures_not_errors() {
        let factory = MockFactory::new(Reply::Status(200));
        let params = JobParameters::new().with(key::PAYLOAD, "{}");

        let outcome = job(&factory).run(&ctx(), &params).await.unwrap();

        assert_eq!(
            outcome.cause(),
            Some("missing required job parameter 'address'")
        );
        assert!(factory.requests().is_empty());
    }

    #[tokio::test]
    async fn malformed_address_is_failure() {
        let factory = MockFactory::new(Reply::Status(200));
        let params = params().with(key::ADDRESS, "not a url");

        let outcome = job(&factory).run(&ctx(), &params).await.unwrap();

        assert!(outcome.cause().unwrap().contains("not a url"));
        assert!(factory.requests().is_empty());
    }

    #[tokio::test]
    async fn factory_failure_is_initialization_error() {
        let factory = MockFactory::failing();

        let result = job(&factory).run(&ctx(), &params()).await;

        assert!(matches!(
            result,
            Err(JobError::Initialization(HttpError::Build(_)))
        ));
        assert!(factory.requests().is_empty());
    }

    #[tokio::test]
    async fn repeated_runs_classify_identically() {
        let factory = MockFactory::new(Reply::Status(500));
        let job = job(&factory);

        let first = job.run(&ctx(), &params()).await.unwrap();
        let second = job.run(&ctx(), &params()).await.unwrap();
        let third = job.run(&ctx(), &params()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second, third);
    }
}

mod cancellation {
    use super::*;

    #[tokio::test]
    async fn cancel_aborts_in_flight_request() {
        let factory = MockFactory::new(Reply::Hang);
        let (handle, signal) = CancelSignal::pair();
        let ctx = JobContext::new("job-1").with_cancel(signal);
        let job = job(&factory);

        let params = params();
        let run = job.run(&ctx, &params);
        let cancel = async {
            tokio::task::yield_now().await;
            handle.cancel();
        };
        let (outcome, ()) = tokio::join!(run, cancel);

        let cause = outcome.unwrap().cause().unwrap().to_string();
        assert!(cause.contains("cancelled"));
        assert!(cause.contains(ADDRESS));
    }

    #[tokio::test]
    async fn already_cancelled_context_sends_nothing() {
        let factory = MockFactory::new(Reply::Status(200));
        let (handle, signal) = CancelSignal::pair();
        handle.cancel();
        let ctx = JobContext::new("job-1").with_cancel(signal);

        let outcome = job(&factory).run(&ctx, &params()).await.unwrap();

        assert!(!outcome.is_success());
        assert!(factory.requests().is_empty());
    }
}

#[test]
fn job_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<WebhookJob>();
}
