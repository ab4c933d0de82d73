//! Tests for the run module.

use super::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use webhook_job::config::Cli;
use webhook_job::webhook::{
    HttpClient, HttpError, HttpRequest, HttpResponse, TlsMode, TransportConfig,
};

fn make_test_config(extra: &[&str]) -> ValidatedConfig {
    let mut args = vec![
        "webhook-job",
        "--address",
        "https://hooks.example.com/events",
        "--payload",
        r#"{"a":1}"#,
    ];
    args.extend(extra);
    ValidatedConfig::from_raw(&Cli::parse_from_iter(args), None, None).unwrap()
}

/// Client answering every request with a fixed status.
struct FixedClient(u16);

impl HttpClient for FixedClient {
    async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse::new(
            http::StatusCode::from_u16(self.0).unwrap(),
            0,
        ))
    }
}

/// Factory counting builds and remembering the last TLS mode.
#[derive(Default)]
struct CountingFactory {
    status: u16,
    builds: Arc<AtomicUsize>,
    verified: Arc<AtomicUsize>,
}

impl ClientFactory for CountingFactory {
    type Client = FixedClient;

    fn build(&self, transport: &TransportConfig) -> Result<FixedClient, HttpError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        if transport.tls == TlsMode::Verify {
            self.verified.fetch_add(1, Ordering::SeqCst);
        }
        Ok(FixedClient(self.status))
    }
}

mod run_error {
    use super::*;

    #[test]
    fn job_error_displays_cause() {
        let error = RunError::from(JobError::Initialization(HttpError::Build(
            "no TLS backend".to_string(),
        )));
        assert!(error.to_string().contains("no TLS backend"));
    }

    #[test]
    fn validation_error_displays_key() {
        let error = RunError::from(ParameterError::Missing { key: "payload" });
        assert!(error.to_string().contains("payload"));
    }
}

mod policy {
    use super::*;

    #[test]
    fn report_reflects_fixed_budget() {
        let report = policy_report(JobPolicy::fixed(7));

        assert_eq!(
            report,
            PolicyReport {
                max_fails: 7,
                max_concurrency: 0,
                should_retry: true,
            }
        );
    }

    #[test]
    fn report_serializes_field_names() {
        let json = serde_json::to_value(policy_report(JobPolicy::fixed(1))).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"max_fails": 1, "max_concurrency": 0, "should_retry": true})
        );
    }
}

mod execute_job {
    use super::*;

    #[tokio::test]
    async fn delivers_with_configured_job() {
        let config = make_test_config(&["--skip-cert-verify"]);
        let factory = CountingFactory {
            status: 200,
            ..CountingFactory::default()
        };
        let builds = factory.builds.clone();
        let verified = factory.verified.clone();
        let job = build_job(&config).with_factory(factory);

        let outcome = execute_job(&job, &config, CancelSignal::never())
            .await
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert_eq!(verified.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_delivery_is_ok_with_failure() {
        let config = make_test_config(&[]);
        let factory = CountingFactory {
            status: 503,
            ..CountingFactory::default()
        };
        let job = build_job(&config).with_factory(factory);

        let outcome = execute_job(&job, &config, CancelSignal::never())
            .await
            .unwrap();

        assert!(outcome.cause().unwrap().contains("503"));
    }

    #[test]
    fn build_job_applies_config() {
        let config = make_test_config(&["--max-fails", "4", "--timeout", "0"]);
        let job = build_job(&config);

        assert_eq!(job.max_fails(), 4);
        assert_eq!(job.transport().timeout, None);
    }
}
