//! Job parameters as supplied by the scheduler, and their typed view.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::webhook::{TlsMode, WebhookTarget};

/// Well-known parameter keys.
pub mod key {
    /// Raw request body (string, required).
    pub const PAYLOAD: &str = "payload";
    /// Target URL (string, required).
    pub const ADDRESS: &str = "address";
    /// Transport selector (bool, optional). `true` selects the verifying
    /// transport; see [`WebhookParams::verify_tls`](super::WebhookParams::verify_tls).
    pub const SKIP_CERT_VERIFY: &str = "skip_cert_verify";
    /// `Authorization` header value (string, optional).
    pub const AUTH_HEADER: &str = "auth_header";
}

/// Error for a missing or mistyped job parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    /// A required key is absent.
    #[error("missing required job parameter '{key}'")]
    Missing {
        /// The parameter key
        key: &'static str,
    },

    /// A key is present but holds the wrong JSON type.
    #[error("job parameter '{key}' must be a {expected}")]
    WrongType {
        /// The parameter key
        key: &'static str,
        /// Expected JSON type
        expected: &'static str,
    },
}

/// String-keyed bag of opaque values handed to a job invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobParameters(Map<String, Value>);

impl JobParameters {
    /// Creates an empty parameter bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a parameter bag from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a JSON object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sets a parameter, replacing any previous value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a parameter, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of parameters in the bag.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the bag holds no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn required_str(&self, key: &'static str) -> Result<&str, ParameterError> {
        match self.0.get(key) {
            None => Err(ParameterError::Missing { key }),
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(ParameterError::WrongType {
                key,
                expected: "string",
            }),
        }
    }

    fn optional_str(&self, key: &'static str) -> Result<Option<&str>, ParameterError> {
        match self.0.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(ParameterError::WrongType {
                key,
                expected: "string",
            }),
        }
    }
}

impl From<Map<String, Value>> for JobParameters {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Reads only the transport selector.
///
/// Anything other than the boolean `true` (absent, `false`, or a value of
/// another type) selects [`TlsMode::SkipVerify`].
#[must_use]
pub fn tls_mode(params: &JobParameters) -> TlsMode {
    let verify_tls = matches!(params.get(key::SKIP_CERT_VERIFY), Some(Value::Bool(true)));
    TlsMode::from_verify(verify_tls)
}

/// Typed, validated view of a webhook job's parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookParams {
    /// Raw request body.
    pub payload: String,
    /// Target URL as supplied.
    pub address: String,
    /// Whether to verify the server certificate.
    ///
    /// Set from the external `skip_cert_verify` key with its historical,
    /// inverted meaning: `skip_cert_verify = true` turns verification on.
    pub verify_tls: bool,
    /// `Authorization` header value; `None` when absent or empty.
    pub auth_header: Option<String>,
}

impl WebhookParams {
    /// Extracts the webhook parameters from a parameter bag.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError`] if `payload` or `address` is missing or
    /// not a string, or if `auth_header` is present but not a string.
    pub fn from_parameters(params: &JobParameters) -> Result<Self, ParameterError> {
        let payload = params.required_str(key::PAYLOAD)?.to_owned();
        let address = params.required_str(key::ADDRESS)?.to_owned();
        let auth_header = params
            .optional_str(key::AUTH_HEADER)?
            .filter(|v| !v.is_empty())
            .map(str::to_owned);

        Ok(Self {
            payload,
            address,
            verify_tls: tls_mode(params).verifies(),
            auth_header,
        })
    }

    /// Returns the transport mode these parameters select.
    #[must_use]
    pub const fn tls_mode(&self) -> TlsMode {
        TlsMode::from_verify(self.verify_tls)
    }

    /// Converts into the delivery target.
    #[must_use]
    pub fn into_target(self) -> WebhookTarget {
        WebhookTarget::new(self.address, self.payload).with_auth_header(self.auth_header)
    }
}
