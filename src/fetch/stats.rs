//! Fetch Statistics Module
//!
//! Tracks network call counts, failures and response times.

use std::time::Duration;

use serde::Serialize;

// == Fetch Stats ==
/// Observability counters for the request coordinator.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchStats {
    /// Settled network fetches (one per de-duplicated request)
    pub api_calls: u64,
    /// Fetches that settled with an error
    pub errors: u64,
    /// Running mean of fetch duration in milliseconds, retries included
    pub avg_response_ms: f64,
}

impl FetchStats {
    // == Constructor ==
    /// Creates a new FetchStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Call ==
    /// Folds one settled fetch into the counters.
    pub fn record_call(&mut self, elapsed: Duration, failed: bool) {
        self.api_calls += 1;
        if failed {
            self.errors += 1;
        }

        let sample = elapsed.as_secs_f64() * 1000.0;
        self.avg_response_ms += (sample - self.avg_response_ms) / self.api_calls as f64;
    }

    // == Error Rate ==
    /// Returns errors / api_calls, or 0.0 before the first call.
    pub fn error_rate(&self) -> f64 {
        if self.api_calls == 0 {
            0.0
        } else {
            self.errors as f64 / self.api_calls as f64
        }
    }
}
