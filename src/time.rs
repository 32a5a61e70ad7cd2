//! Sleep abstraction for testability.
//!
//! Retry delays are the only place the core waits on the clock. Abstracting
//! the sleep behind a trait lets tests drive the retry loop without real
//! delays.

use std::time::Duration;

/// Abstraction over delaying the current task.
///
/// The sleep must suspend only the calling task, never the thread, so that
/// one message's retry wait cannot stall the processing of other messages.
pub trait Sleeper: Send + Sync {
    /// Waits for the given duration.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns immediately, for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}
