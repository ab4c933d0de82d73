//! Retry budget for the webhook job.
//!
//! The budget comes from an environment-style source that is read on every
//! call, so operators can change it between invocations without a restart.
//! The source is injected so tests never touch the process environment.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Environment variable holding the maximum number of failed attempts.
pub const MAX_FAILS_ENV: &str = "JOBSERVICE_WEBHOOK_JOB_MAX_RETRY";

/// Budget used when the variable is absent, empty, or unparseable.
///
/// With the scheduler's backoff this covers roughly three hours of retries.
pub const DEFAULT_MAX_FAILS: u32 = 10;

/// Read-only view of environment-style configuration.
pub trait EnvSource: Send + Sync {
    /// Returns the value of `key`, or `None` if unset or not valid UTF-8.
    fn var(&self, key: &str) -> Option<String>;
}

/// [`EnvSource`] backed by the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Parses a raw max-fails value.
///
/// Only plain ASCII decimal digits that fit in a `u32` are accepted; any
/// other input, including an absent value, yields [`DEFAULT_MAX_FAILS`].
#[must_use]
pub fn parse_max_fails(raw: Option<&str>) -> u32 {
    raw.filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_FAILS)
}

/// Where the retry budget comes from.
#[derive(Clone)]
pub enum MaxFailsSource {
    /// Read [`MAX_FAILS_ENV`] from the given source on every call.
    Environment(Arc<dyn EnvSource>),
    /// A fixed budget.
    Fixed(u32),
}

impl fmt::Debug for MaxFailsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment(_) => f.debug_tuple("Environment").field(&MAX_FAILS_ENV).finish(),
            Self::Fixed(n) => f.debug_tuple("Fixed").field(n).finish(),
        }
    }
}

/// Retry policy advertised to the scheduler.
#[derive(Debug, Clone)]
pub struct JobPolicy {
    max_fails: MaxFailsSource,
}

impl JobPolicy {
    /// Reads the budget from the process environment on every call.
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_env(ProcessEnv)
    }

    /// Reads the budget from `env` on every call.
    #[must_use]
    pub fn with_env(env: impl EnvSource + 'static) -> Self {
        Self {
            max_fails: MaxFailsSource::Environment(Arc::new(env)),
        }
    }

    /// Uses a fixed budget.
    #[must_use]
    pub const fn fixed(max_fails: u32) -> Self {
        Self {
            max_fails: MaxFailsSource::Fixed(max_fails),
        }
    }

    /// Returns how many failed attempts the scheduler should tolerate.
    ///
    /// Never fails: bad configuration falls back to [`DEFAULT_MAX_FAILS`].
    #[must_use]
    pub fn max_fails(&self) -> u32 {
        match &self.max_fails {
            MaxFailsSource::Environment(env) => parse_max_fails(env.var(MAX_FAILS_ENV).as_deref()),
            MaxFailsSource::Fixed(n) => *n,
        }
    }

    /// Returns the configured source.
    #[must_use]
    pub const fn source(&self) -> &MaxFailsSource {
        &self.max_fails
    }
}

impl Default for JobPolicy {
    fn default() -> Self {
        Self::from_env()
    }
}
