//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Job id used in log output when none is given.
pub const JOB_ID: &str = "webhook-job";

/// Default overall request timeout in seconds (0 disables the limit).
pub const TIMEOUT_SECS: u64 = 30;

/// Default connection timeout in seconds (0 disables the limit).
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default config file written by `init`.
pub const CONFIG_FILE: &str = "webhook-job.toml";

/// Converts a seconds value into an optional limit, where 0 means none.
#[must_use]
pub const fn limit(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}
