//! Per-call request pacing.
//!
//! A [`Pacing`] sets a minimum duration for one call: the request and a timer
//! of `1 / requests_per_second` run together, and the call completes only when
//! both have. Nothing is shared between calls, so concurrent callers using the
//! same rate are paced independently rather than jointly.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use request_layer::request::{Pacing, paced};
//!
//! # async fn example() {
//! let pacing = Pacing::from_requests_per_second(2.0);
//! // Completes no earlier than 500ms after it starts.
//! let value = paced(pacing, async { 42 }).await;
//! assert_eq!(value, 42);
//! # }
//! ```

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// Minimum duration applied to a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    interval: Duration,
}

impl Pacing {
    /// Creates pacing for the given rate.
    ///
    /// Returns `None` for zero, negative or NaN rates. An infinite rate
    /// yields a zero interval.
    #[must_use]
    pub fn from_requests_per_second(requests_per_second: f64) -> Option<Self> {
        if requests_per_second.is_nan() || requests_per_second <= 0.0 {
            return None;
        }
        let interval =
            Duration::try_from_secs_f64(1.0 / requests_per_second).unwrap_or(Duration::MAX);
        Some(Self { interval })
    }

    /// Creates pacing with an explicit interval.
    #[must_use]
    pub fn from_interval(interval: Duration) -> Self {
        Self { interval }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleeps for the interval.
    pub async fn wait(self) {
        debug!(interval_ms = self.interval.as_millis(), "pacing request");
        tokio::time::sleep(self.interval).await;
    }
}

/// Runs `operation` alongside the pacing timer and returns its output once both
/// have finished.
///
/// Without pacing the operation is awaited directly.
pub async fn paced<F>(pacing: Option<Pacing>, operation: F) -> F::Output
where
    F: Future,
{
    match pacing {
        Some(pacing) => {
            let (output, ()) = tokio::join!(operation, pacing.wait());
            output
        }
        None => operation.await,
    }
}
