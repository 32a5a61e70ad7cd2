//! Retry policy and the bounded-backoff attempt loop.

use std::time::Duration;

use super::error::{ProcessError, TransportError};
use crate::http::{HttpClient, HttpError, HttpRequest, HttpResponse};
use crate::time::Sleeper;

/// Configuration for exponential-backoff retry of failed HTTP round trips.
///
/// When disabled (the default), exactly one attempt is made and any
/// transport failure is immediately terminal. When enabled, a retryable
/// failure is re-attempted after `initial_delay`, with the delay multiplied
/// by `multiplier` after each subsequent failure and capped at `max_delay`,
/// until `max_attempts` attempts (including the first) have been made.
///
/// # Example
///
/// ```
/// use http_relay::processor::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::enabled()
///     .with_max_attempts(5)
///     .with_initial_delay(Duration::from_millis(200))
///     .with_multiplier(1.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Whether transport failures are retried at all.
    pub enabled: bool,

    /// Maximum number of attempts, including the initial attempt.
    ///
    /// A value of 1 means no retries even when enabled.
    pub max_attempts: u32,

    /// Delay before the first retry.
    pub initial_delay: Duration,

    /// Cap applied to the computed delay.
    pub max_delay: Duration,

    /// Multiplier applied to the delay after each retry.
    ///
    /// Must be at least 1.0 so backoff is non-decreasing.
    pub multiplier: f64,

    /// Status codes treated as retryable failures.
    ///
    /// `None` selects the transient default set: any 5xx, plus
    /// 408 Request Timeout and 429 Too Many Requests. An explicit list
    /// replaces that set entirely.
    pub retry_on_status: Option<Vec<u16>>,
}

impl RetryPolicy {
    /// Default maximum attempts.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// Default initial delay (1 second).
    pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

    /// Default maximum delay (30 seconds).
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

    /// Default multiplier (2.0).
    pub const DEFAULT_MULTIPLIER: f64 = 2.0;

    /// Creates a disabled policy with default backoff parameters.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            initial_delay: Self::DEFAULT_INITIAL_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            multiplier: Self::DEFAULT_MULTIPLIER,
            retry_on_status: None,
        }
    }

    /// Creates an enabled policy with default backoff parameters.
    #[must_use]
    pub const fn enabled() -> Self {
        let mut policy = Self::disabled();
        policy.enabled = true;
        policy
    }

    /// Sets the maximum number of attempts.
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is zero.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        assert!(max_attempts >= 1, "max_attempts must be at least 1");
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the delay before the first retry.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the cap on computed delays.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the backoff multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `multiplier` is below 1.0 (backoff must be non-decreasing).
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        assert!(multiplier >= 1.0, "multiplier must be at least 1.0");
        self.multiplier = multiplier;
        self
    }

    /// Replaces the retryable-status set with an explicit list.
    #[must_use]
    pub fn with_retry_on_status(mut self, statuses: Vec<u16>) -> Self {
        self.retry_on_status = Some(statuses);
        self
    }

    /// Number of attempts this policy allows: 1 when disabled.
    #[must_use]
    pub const fn attempt_budget(&self) -> u32 {
        if self.enabled { self.max_attempts } else { 1 }
    }

    /// Computes the delay before retry number `retry` (0-indexed).
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        // Safe cast: retry counts are small and i32::MAX is ~2 billion
        #[allow(clippy::cast_possible_wrap)]
        let multiplier = self.multiplier.powi(retry as i32);
        let delay_secs = self.initial_delay.as_secs_f64() * multiplier;
        let capped = delay_secs.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped)
    }

    /// Returns true if another attempt is allowed after attempt `attempt`
    /// (1 = the initial attempt).
    #[must_use]
    pub const fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.attempt_budget()
    }

    /// Returns true if the given failure is worth re-attempting.
    ///
    /// Connection failures and timeouts are transient; malformed requests
    /// are not. Status retryability follows `retry_on_status`.
    #[must_use]
    pub fn is_retryable(&self, error: &TransportError) -> bool {
        match error {
            TransportError::Http(e) => match e {
                HttpError::Connection(_) | HttpError::Timeout => true,
                HttpError::InvalidRequest(_) => false,
            },
            TransportError::Status { status, .. } => self.is_retryable_status(*status),
        }
    }

    fn is_retryable_status(&self, status: http::StatusCode) -> bool {
        self.retry_on_status.as_ref().map_or_else(
            || {
                status.is_server_error()
                    || status == http::StatusCode::TOO_MANY_REQUESTS
                    || status == http::StatusCode::REQUEST_TIMEOUT
            },
            |listed| listed.contains(&status.as_u16()),
        )
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Executes one HTTP round trip under the retry policy.
///
/// The request is built once by the caller and reused across attempts;
/// expressions are never re-evaluated here. Non-retryable failures surface
/// immediately; retryable ones are re-attempted until the budget is
/// consumed, then surfaced as [`ProcessError::Exhausted`] carrying the last
/// transport error.
pub(super) async fn execute_with_retry<H: HttpClient, S: Sleeper>(
    client: &H,
    sleeper: &S,
    policy: &RetryPolicy,
    request: &HttpRequest,
) -> Result<HttpResponse, ProcessError> {
    let budget = policy.attempt_budget();
    let mut last_error: Option<TransportError> = None;

    for attempt in 1..=budget {
        match single_attempt(client, request).await {
            Ok(response) => return Ok(response),
            Err(e) => {
                if !policy.is_retryable(&e) {
                    return Err(ProcessError::Transport(e));
                }

                tracing::warn!(attempt, budget, "HTTP attempt failed: {e}");
                last_error = Some(e);

                // No sleep after the final attempt
                if policy.should_retry(attempt) {
                    let delay = policy.delay_for_retry(attempt - 1);
                    sleeper.sleep(delay).await;
                }
            }
        }
    }

    Err(ProcessError::Exhausted {
        attempts: budget,
        last: last_error.expect("attempt budget is at least 1"),
    })
}

/// Executes a single attempt, classifying non-2xx statuses as failures.
async fn single_attempt<H: HttpClient>(
    client: &H,
    request: &HttpRequest,
) -> Result<HttpResponse, TransportError> {
    let response = client.request(request.clone()).await?;

    if response.is_success() {
        return Ok(response);
    }

    Err(TransportError::Status {
        status: response.status,
        body: response.body_text().map(ToString::to_string),
    })
}
