//! Result of one delivery attempt as reported to the scheduler.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::webhook::DeliveryError;

/// Classified result of a single webhook delivery attempt.
///
/// A `Failure` is an ordinary, retryable result: `run` returns it as a
/// value so the scheduler can do its retry bookkeeping without reading
/// logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// The endpoint answered with a 2xx status.
    Success {
        /// HTTP status code
        status: u16,
        /// Time from sending the request to reading the full response
        #[serde(with = "millis")]
        elapsed: Duration,
    },
    /// The attempt failed before or after reaching the endpoint.
    Failure {
        /// Human-readable cause
        cause: String,
        /// HTTP status code, when the endpoint answered
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
    },
}

impl DeliveryOutcome {
    /// Builds a failure outcome from a delivery error.
    #[must_use]
    pub fn failure(error: &DeliveryError) -> Self {
        let status = match error {
            DeliveryError::Status { status, .. } => Some(*status),
            _ => None,
        };
        Self::Failure {
            cause: error.to_string(),
            status,
        }
    }

    /// Returns true for [`DeliveryOutcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the failure cause, if any.
    #[must_use]
    pub fn cause(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { cause, .. } => Some(cause),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::cast_possible_truncation)] // u64 millis covers ~584 million years
    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
