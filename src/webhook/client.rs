//! Production HTTP client and transport selection.

use std::time::Duration;

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Certificate handling for the outbound transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    /// Full certificate and hostname verification.
    Verify,
    /// Accept any server certificate.
    #[default]
    SkipVerify,
}

impl TlsMode {
    /// Maps the internal `verify_tls` flag onto a transport mode.
    #[must_use]
    pub const fn from_verify(verify_tls: bool) -> Self {
        if verify_tls {
            Self::Verify
        } else {
            Self::SkipVerify
        }
    }

    /// Returns true if this mode validates server certificates.
    #[must_use]
    pub const fn verifies(self) -> bool {
        matches!(self, Self::Verify)
    }
}

impl std::fmt::Display for TlsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Verify => write!(f, "verify"),
            Self::SkipVerify => write!(f, "skip-verify"),
        }
    }
}

/// Everything needed to build the client for one delivery attempt.
///
/// `tls` comes from the invocation parameters, the timeouts from the
/// job's [`TransportSettings`](crate::job::TransportSettings). `None`
/// leaves the corresponding limit to the underlying transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransportConfig {
    /// Certificate handling
    pub tls: TlsMode,
    /// Overall request timeout
    pub timeout: Option<Duration>,
    /// Connection establishment timeout
    pub connect_timeout: Option<Duration>,
}

/// Builds an [`HttpClient`] for a given transport configuration.
///
/// The delivery job asks its factory for a fresh client on every run, so
/// no client state is shared between invocations.
pub trait ClientFactory: Send + Sync {
    /// The client type produced by this factory.
    type Client: HttpClient;

    /// Builds a client for one delivery attempt.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Build`] if the transport cannot be set up.
    fn build(&self, transport: &TransportConfig) -> Result<Self::Client, HttpError>;
}

/// Production HTTP client using reqwest.
///
/// A thin wrapper around `reqwest::Client` that implements [`HttpClient`]
/// and remembers which [`TlsMode`] it was built with.
///
/// # Example
///
/// ```no_run
/// use webhook_job::webhook::{HttpClient, HttpRequest, ReqwestClient, TransportConfig};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::with_transport(&TransportConfig::default())?;
/// let url = Url::parse("https://hooks.example.com/events")?;
/// let request = HttpRequest::post(url).with_body(br#"{"a":1}"#.to_vec());
/// let response = client.request(request).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
    tls: TlsMode,
}

impl ReqwestClient {
    /// Creates a client for the given transport configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Build`] if reqwest rejects the configuration
    /// (for example when no TLS backend can be initialized).
    pub fn with_transport(transport: &TransportConfig) -> Result<Self, HttpError> {
        let mut builder =
            reqwest::Client::builder().danger_accept_invalid_certs(!transport.tls.verifies());

        if let Some(timeout) = transport.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = transport.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        let inner = builder
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;

        Ok(Self {
            inner,
            tls: transport.tls,
        })
    }

    /// Returns the certificate handling this client was built with.
    #[must_use]
    pub const fn tls_mode(&self) -> TlsMode {
        self.tls
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let response = self
            .inner
            .request(req.method, req.url.as_str())
            .headers(req.headers)
            .body(req.body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body_len = drain_body(response).await;

        Ok(HttpResponse::new(status, body_len))
    }
}

/// Upper bound on response bytes read before the response is dropped.
const MAX_DRAIN_BYTES: usize = 64 * 1024;

/// Reads and discards up to [`MAX_DRAIN_BYTES`] of the body, returning how
/// many bytes were read.
///
/// Read failures are logged and swallowed: the status line has already
/// arrived and alone decides the outcome.
async fn drain_body(mut response: reqwest::Response) -> usize {
    let mut drained = 0;
    while drained < MAX_DRAIN_BYTES {
        match response.chunk().await {
            Ok(Some(chunk)) => drained += chunk.len(),
            Ok(None) => break,
            Err(e) => {
                tracing::debug!("Discarding unreadable response body: {e}");
                break;
            }
        }
    }
    drained
}

fn map_reqwest_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else if e.is_builder() {
        HttpError::InvalidUrl(e.to_string())
    } else {
        HttpError::Connection(Box::new(e))
    }
}

/// [`ClientFactory`] producing [`ReqwestClient`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestFactory;

impl ClientFactory for ReqwestFactory {
    type Client = ReqwestClient;

    fn build(&self, transport: &TransportConfig) -> Result<ReqwestClient, HttpError> {
        ReqwestClient::with_transport(transport)
    }
}
