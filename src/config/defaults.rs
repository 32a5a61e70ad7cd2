//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the
//! codebase.

use std::time::Duration;

/// Default HTTP method for relayed requests.
pub const METHOD: &str = "GET";

/// Default response decoding type.
pub const RESPONSE_TYPE: &str = "text";

/// Default maximum number of retry attempts.
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Default initial retry delay in milliseconds.
pub const RETRY_INITIAL_DELAY_MS: u64 = 1_000;

/// Default maximum retry delay in milliseconds.
pub const RETRY_MAX_DELAY_MS: u64 = 30_000;

/// Default retry backoff multiplier.
pub const RETRY_MULTIPLIER: f64 = 2.0;

/// Default initial retry delay as Duration.
#[must_use]
pub const fn retry_initial_delay() -> Duration {
    Duration::from_millis(RETRY_INITIAL_DELAY_MS)
}

/// Default maximum retry delay as Duration.
#[must_use]
pub const fn retry_max_delay() -> Duration {
    Duration::from_millis(RETRY_MAX_DELAY_MS)
}
