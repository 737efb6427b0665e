//! Rate Entry Module
//!
//! Defines a cached exchange rate together with the moment it was fetched.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

// == Rate Entry ==
/// A fetched rate. Never mutated; a refresh replaces the whole entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RateEntry {
    /// Units of the target currency per one unit of the source currency
    pub rate: f64,
    /// Monotonic fetch time, used for expiry
    pub fetched_at: Instant,
    /// Wall-clock fetch time, for display
    pub fetched_at_utc: DateTime<Utc>,
}

impl RateEntry {
    // == Constructor ==
    /// Creates an entry stamped with the current time.
    pub fn new(rate: f64) -> Self {
        Self::fetched_at(rate, Instant::now())
    }

    /// Creates an entry stamped with an explicit monotonic time.
    pub fn fetched_at(rate: f64, fetched_at: Instant) -> Self {
        Self {
            rate,
            fetched_at,
            fetched_at_utc: Utc::now(),
        }
    }

    // == Age ==
    /// Time elapsed since the fetch, as seen at `now`.
    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.fetched_at)
    }

    // == Is Valid ==
    /// Checks whether the entry may still be used.
    ///
    /// Valid only while `now - fetched_at < max_age`; at exactly `max_age`
    /// the entry is already expired.
    pub fn is_valid_at(&self, now: Instant, max_age: Duration) -> bool {
        self.age_at(now) < max_age
    }
}
