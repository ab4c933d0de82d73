//! Single-attempt webhook delivery: request construction and
//! response classification.

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::HeaderValue;

use super::{DeliveryError, HttpClient, HttpRequest, HttpResponse};

/// Content type sent with every webhook payload.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Where and what to deliver.
///
/// The payload is opaque: it is sent byte-for-byte and never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookTarget {
    address: String,
    payload: String,
    auth_header: Option<String>,
}

impl WebhookTarget {
    /// Creates a target without an `Authorization` header.
    #[must_use]
    pub fn new(address: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            payload: payload.into(),
            auth_header: None,
        }
    }

    /// Sets the `Authorization` header value. Empty values are dropped.
    #[must_use]
    pub fn with_auth_header(mut self, value: Option<String>) -> Self {
        self.auth_header = value.filter(|v| !v.is_empty());
        self
    }

    /// Returns the target address as supplied.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the raw payload.
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Returns the `Authorization` header value, if any.
    #[must_use]
    pub fn auth_header(&self) -> Option<&str> {
        self.auth_header.as_deref()
    }

    /// Builds the POST request for this target.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::InvalidAddress`] if the address is not an
    /// absolute URL, or [`DeliveryError::InvalidHeader`] if the auth
    /// header contains bytes not allowed in a header value.
    pub fn build_request(&self) -> Result<HttpRequest, DeliveryError> {
        let url = url::Url::parse(&self.address).map_err(|e| DeliveryError::InvalidAddress {
            address: self.address.clone(),
            reason: e.to_string(),
        })?;

        let mut request = HttpRequest::post(url)
            .with_body(self.payload.as_bytes())
            .with_header(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));

        if let Some(auth) = &self.auth_header {
            let value = HeaderValue::from_str(auth).map_err(|e| DeliveryError::InvalidHeader {
                address: self.address.clone(),
                reason: e.to_string(),
            })?;
            request = request.with_header(AUTHORIZATION, value);
        }

        Ok(request)
    }
}

/// Sends one delivery attempt and classifies the response.
///
/// The client drains the response body before returning, so the
/// connection is released on every path.
///
/// # Errors
///
/// - Request construction failures (see [`WebhookTarget::build_request`])
/// - [`DeliveryError::Transport`] if no response was received
/// - [`DeliveryError::Status`] for any status outside `[200, 300)`
pub async fn deliver<H: HttpClient>(
    client: &H,
    target: &WebhookTarget,
) -> Result<HttpResponse, DeliveryError> {
    let request = target.build_request()?;

    let response = client
        .request(request)
        .await
        .map_err(|source| DeliveryError::Transport {
            address: target.address.clone(),
            source,
        })?;

    classify(target, response)
}

/// Maps a response onto success or [`DeliveryError::Status`].
///
/// # Errors
///
/// Returns [`DeliveryError::Status`] for non-2xx responses.
pub fn classify(target: &WebhookTarget, response: HttpResponse) -> Result<HttpResponse, DeliveryError> {
    if response.is_success() {
        return Ok(response);
    }

    Err(DeliveryError::Status {
        address: target.address.clone(),
        status: response.status.as_u16(),
    })
}
