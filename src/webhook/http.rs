//! HTTP request/response types and client trait.

use super::HttpError;

/// An outbound webhook request.
///
/// Uses standard `http` crate types for method and headers so any
/// [`HttpClient`] implementation can send it. The body is carried as raw
/// bytes and is never re-encoded.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: http::Method,
    /// Target URL
    pub url: url::Url,
    /// HTTP headers to send
    pub headers: http::HeaderMap,
    /// Request body
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Creates a POST request to the given URL with an empty body.
    #[must_use]
    pub fn post(url: url::Url) -> Self {
        Self {
            method: http::Method::POST,
            url,
            headers: http::HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a header, replacing any previous value for the same name.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// The part of a webhook response the delivery job cares about.
///
/// Clients drain the body before returning, so holding an `HttpResponse`
/// never keeps a connection busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: http::StatusCode,
    /// Number of body bytes read and released
    pub body_len: usize,
}

impl HttpResponse {
    /// Creates a new HTTP response.
    #[must_use]
    pub const fn new(status: http::StatusCode, body_len: usize) -> Self {
        Self { status, body_len }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Trait for sending webhook requests.
///
/// Abstracts the HTTP library so the delivery logic can be tested with
/// mock clients.
///
/// # Example
///
/// ```ignore
/// use webhook_job::webhook::{HttpClient, HttpError, HttpRequest, HttpResponse};
///
/// struct AlwaysOk;
///
/// impl HttpClient for AlwaysOk {
///     async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
///         Ok(HttpResponse::new(http::StatusCode::OK, 0))
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Sends an HTTP request and returns the response once its body has
    /// been fully read.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when:
    /// - Network connection fails ([`HttpError::Connection`])
    /// - Request times out ([`HttpError::Timeout`])
    /// - URL is rejected by the client ([`HttpError::InvalidUrl`])
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send;
}
