//! Conversion Report
//!
//! Aggregated counters exposed for observability only.

use serde::Serialize;

use crate::fetch::FetchStats;

/// Snapshot of service counters.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    /// Settled network fetches
    pub api_calls: u64,
    /// Conversions answered from the cache
    pub cache_hits: u64,
    /// Network fetches that failed
    pub errors: u64,
    /// errors / api_calls
    pub error_rate: f64,
    /// Running mean fetch duration in milliseconds
    pub avg_response_ms: f64,
    /// Entries currently stored, expired ones included
    pub cache_size: usize,
    /// Entries dropped for capacity
    pub evictions: u64,
    /// cache_hits / max(1, api_calls + cache_hits)
    pub cache_hit_rate: f64,
    /// Distinct fetches in flight
    pub pending_requests: usize,
}

impl ConversionReport {
    pub fn new(
        fetch: FetchStats,
        cache_hits: u64,
        cache_size: usize,
        evictions: u64,
        pending_requests: usize,
    ) -> Self {
        let lookups = (fetch.api_calls + cache_hits).max(1);
        Self {
            api_calls: fetch.api_calls,
            cache_hits,
            errors: fetch.errors,
            error_rate: fetch.error_rate(),
            avg_response_ms: fetch.avg_response_ms,
            cache_size,
            evictions,
            cache_hit_rate: cache_hits as f64 / lookups as f64,
            pending_requests,
        }
    }
}
