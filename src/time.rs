//! Time abstraction for testability.
//!
//! This module provides a [`Sleeper`] trait so settle delays can be
//! observed (and skipped) in tests while production code uses Tokio timers.

use std::future::Future;
use std::time::Duration;

/// Abstraction over async sleeping.
///
/// # Example
///
/// ```
/// use nodus_ip::time::{Sleeper, TokioSleeper};
/// use std::time::Duration;
///
/// # async fn example() {
/// TokioSleeper.sleep(Duration::from_millis(10)).await;
/// # }
/// ```
pub trait Sleeper: Send + Sync {
    /// Waits for the given duration.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Production sleeper backed by [`tokio::time::sleep`].
///
/// A zero duration returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Sleeper that returns immediately and records every requested delay.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: std::sync::Mutex<Vec<Duration>>,
}

#[cfg(test)]
impl RecordingSleeper {
    /// Returns the delays requested so far.
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

#[cfg(test)]
impl Sleeper for std::sync::Arc<RecordingSleeper> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }
}
