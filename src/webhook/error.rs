//! Error types for HTTP and delivery operations.

use thiserror::Error;

use crate::job::ParameterError;

/// Error type for HTTP operations.
///
/// Describes what went wrong at the transport layer without dictating
/// how the caller classifies it.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// The server did not respond within the configured timeout period.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be constructed for the requested transport.
    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

/// Error type for a single failed webhook delivery attempt.
///
/// Every variant is a delivery failure: it is logged and reported as a
/// [`DeliveryOutcome::Failure`](crate::job::DeliveryOutcome::Failure),
/// never returned as a hard job error.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Job parameters were missing or of the wrong type.
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// The target address could not be turned into a request URL.
    #[error("Invalid webhook address '{address}': {reason}")]
    InvalidAddress {
        /// The address as supplied
        address: String,
        /// Reason for invalidity
        reason: String,
    },

    /// The `Authorization` value is not a valid HTTP header value.
    #[error("Invalid auth header for webhook job(target: {address}): {reason}")]
    InvalidHeader {
        /// The target address
        address: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Sending the request failed before a response was received.
    #[error("webhook job(target: {address}) request failed: {source}")]
    Transport {
        /// The target address
        address: String,
        /// Underlying transport error
        #[source]
        source: HttpError,
    },

    /// The attempt was cancelled by the caller while in flight.
    #[error("webhook job(target: {address}) cancelled")]
    Cancelled {
        /// The target address
        address: String,
    },

    /// The endpoint answered with a status outside `[200, 300)`.
    #[error("webhook job(target: {address}) response code is {status}")]
    Status {
        /// The target address
        address: String,
        /// Numeric HTTP status code
        status: u16,
    },
}
