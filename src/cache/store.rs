//! Rate Cache Module
//!
//! Bounded rate storage combining a HashMap with insertion-order eviction and
//! time-based expiry.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::cache::{InsertionOrder, RateEntry};
use crate::currency::CurrencyPair;

// == Rate Cache ==
/// Exchange rates keyed by ordered currency pair.
#[derive(Debug)]
pub struct RateCache {
    /// Pair-to-rate storage
    entries: HashMap<CurrencyPair, RateEntry>,
    /// First-insertion order, oldest first
    order: InsertionOrder,
    /// Maximum number of entries kept after any `set`
    size_limit: usize,
    /// How long an entry stays usable
    cache_duration: Duration,
    /// Entries dropped because the cache was over its limit
    evictions: u64,
}

impl RateCache {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `size_limit` - Maximum number of pairs held at once
    /// * `cache_duration` - Validity window of a fetched rate
    pub fn new(size_limit: usize, cache_duration: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            size_limit,
            cache_duration,
            evictions: 0,
        }
    }

    // == Get ==
    /// Returns the rate for `pair` if present and not expired.
    ///
    /// Expired entries read as absent but stay in place until the next sweep.
    pub fn get(&self, pair: &CurrencyPair) -> Option<f64> {
        self.get_at(pair, Instant::now())
    }

    /// Same as [`get`](Self::get) with an explicit clock reading.
    pub fn get_at(&self, pair: &CurrencyPair, now: Instant) -> Option<f64> {
        self.entry_at(pair, now).map(|entry| entry.rate)
    }

    /// Returns the whole valid entry for `pair`.
    pub fn entry_at(&self, pair: &CurrencyPair, now: Instant) -> Option<&RateEntry> {
        self.entries
            .get(pair)
            .filter(|entry| entry.is_valid_at(now, self.cache_duration))
    }

    // == Set ==
    /// Stores `rate` for `pair` stamped with the current time.
    ///
    /// Overwriting keeps the pair's insertion position. If the cache is over
    /// its limit afterwards, the oldest-inserted pair is evicted.
    pub fn set(&mut self, pair: CurrencyPair, rate: f64) {
        self.insert(pair, RateEntry::new(rate));
    }

    /// Stores a prepared entry, applying the same eviction rule as `set`.
    pub fn insert(&mut self, pair: CurrencyPair, entry: RateEntry) {
        self.order.record(&pair);
        self.entries.insert(pair, entry);

        if self.entries.len() > self.size_limit {
            if let Some(oldest) = self.order.pop_oldest() {
                debug!(pair = %oldest, "Evicting oldest rate");
                self.entries.remove(&oldest);
                self.evictions += 1;
            }
        }
    }

    // == Sweep ==
    /// Removes every entry that is expired at `now`.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let expired: Vec<CurrencyPair> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_valid_at(now, self.cache_duration))
            .map(|(pair, _)| pair.clone())
            .collect();

        for pair in &expired {
            self.entries.remove(pair);
            self.order.remove(pair);
        }

        expired.len()
    }

    // == Clear ==
    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn evictions(&self) -> u64 {
        self.evictions
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::pair;

    const TEN_MINUTES: Duration = Duration::from_secs(600);

    #[test]
    fn test_cache_new() {
        let cache = RateCache::new(100, TEN_MINUTES);
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.evictions(), 0);
    }

    #[test]
    fn test_cache_set_and_get() {
        let mut cache = RateCache::new(100, TEN_MINUTES);

        cache.set(pair("USD", "EUR"), 0.92);

        assert_eq!(cache.get(&pair("USD", "EUR")), Some(0.92));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_pair_direction_matters() {
        let mut cache = RateCache::new(100, TEN_MINUTES);

        cache.set(pair("USD", "EUR"), 0.92);

        assert_eq!(cache.get(&pair("EUR", "USD")), None);
    }

    #[test]
    fn test_cache_overwrite() {
        let mut cache = RateCache::new(100, TEN_MINUTES);

        cache.set(pair("USD", "EUR"), 0.92);
        cache.set(pair("USD", "EUR"), 0.93);

        assert_eq!(cache.get(&pair("USD", "EUR")), Some(0.93));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_expiry_is_read_as_absent() {
        let mut cache = RateCache::new(100, TEN_MINUTES);
        let start = Instant::now();

        cache.insert(pair("USD", "EUR"), RateEntry::fetched_at(0.92, start));

        assert_eq!(cache.get_at(&pair("USD", "EUR"), start + Duration::from_secs(599)), Some(0.92));
        assert_eq!(cache.get_at(&pair("USD", "EUR"), start + TEN_MINUTES), None);

        // Reads do not remove anything
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_fifo_eviction() {
        let mut cache = RateCache::new(3, TEN_MINUTES);

        cache.set(pair("USD", "EUR"), 0.92);
        cache.set(pair("USD", "JPY"), 150.0);
        cache.set(pair("USD", "GBP"), 0.79);

        // Reading the oldest entry does not protect it
        assert!(cache.get(&pair("USD", "EUR")).is_some());

        cache.set(pair("USD", "CNY"), 7.2);

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.evictions(), 1);
        assert_eq!(cache.get(&pair("USD", "EUR")), None);
        assert!(cache.get(&pair("USD", "JPY")).is_some());
        assert!(cache.get(&pair("USD", "GBP")).is_some());
        assert!(cache.get(&pair("USD", "CNY")).is_some());
    }

    #[test]
    fn test_cache_overwrite_keeps_insertion_position() {
        let mut cache = RateCache::new(2, TEN_MINUTES);

        cache.set(pair("USD", "EUR"), 0.92);
        cache.set(pair("USD", "JPY"), 150.0);
        cache.set(pair("USD", "EUR"), 0.93);
        cache.set(pair("USD", "GBP"), 0.79);

        assert_eq!(cache.get(&pair("USD", "EUR")), None);
        assert_eq!(cache.get(&pair("USD", "JPY")), Some(150.0));
        assert_eq!(cache.get(&pair("USD", "GBP")), Some(0.79));
    }

    #[test]
    fn test_cache_sweep_removes_only_expired() {
        let mut cache = RateCache::new(100, TEN_MINUTES);
        let start = Instant::now();

        cache.insert(pair("USD", "EUR"), RateEntry::fetched_at(0.92, start));
        cache.insert(
            pair("USD", "JPY"),
            RateEntry::fetched_at(150.0, start + Duration::from_secs(300)),
        );

        let removed = cache.sweep(start + TEN_MINUTES);
        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.get_at(&pair("USD", "JPY"), start + TEN_MINUTES),
            Some(150.0)
        );

        // A swept pair no longer occupies an eviction slot
        cache.set(pair("USD", "EUR"), 0.91);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_clear() {
        let mut cache = RateCache::new(100, TEN_MINUTES);

        cache.set(pair("USD", "EUR"), 0.92);
        cache.set(pair("EUR", "USD"), 1.08);
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.get(&pair("USD", "EUR")), None);
    }
}
