//! Conversion Service
//!
//! Validates input, answers from the rate cache when it can, and otherwise
//! fetches through the request coordinator and stores the new rate.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cache::{RateCache, SharedRateCache};
use crate::config::Config;
use crate::currency::{CurrencyCode, CurrencyPair};
use crate::error::{ConvertError, Result};
use crate::fetch::{RateTransport, RequestCoordinator, RetryPolicy};
use crate::service::ConversionReport;

/// Where a conversion's rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    Cache,
    Network,
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub converted_amount: f64,
    pub rate: f64,
    pub source: RateSource,
    /// When the rate was fetched
    pub updated_at: DateTime<Utc>,
}

// == Conversion Service ==
/// The only entry point outer surfaces call. Cheap to clone; clones share
/// the cache, the pending requests and the counters.
#[derive(Clone)]
pub struct ConversionService {
    cache: SharedRateCache,
    coordinator: RequestCoordinator,
    max_amount: f64,
    currency_pattern: Regex,
    cache_hits: Arc<AtomicU64>,
}

impl ConversionService {
    pub fn new(
        cache: SharedRateCache,
        coordinator: RequestCoordinator,
        max_amount: f64,
        currency_pattern: Regex,
    ) -> Self {
        Self {
            cache,
            coordinator,
            max_amount,
            currency_pattern,
            cache_hits: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Builds the whole stack from configuration.
    ///
    /// Fails only when the configured currency pattern is not a valid regex.
    pub fn from_config(
        config: &Config,
        transport: Arc<dyn RateTransport>,
    ) -> std::result::Result<Self, regex::Error> {
        let cache = Arc::new(RwLock::new(RateCache::new(
            config.cache_size_limit,
            config.cache_duration(),
        )));
        let coordinator = RequestCoordinator::new(
            transport,
            config.api_base_url.clone(),
            config.api_key.clone(),
            RetryPolicy::new(config.retry_count, config.request_timeout()),
        );

        Ok(Self::new(
            cache,
            coordinator,
            config.max_amount,
            config.currency_regex()?,
        ))
    }

    /// Handle to the rate cache, for the sweep task.
    pub fn cache(&self) -> SharedRateCache {
        Arc::clone(&self.cache)
    }

    pub fn coordinator(&self) -> &RequestCoordinator {
        &self.coordinator
    }

    // == Validation ==
    pub fn parse_code(&self, raw: &str) -> Result<CurrencyCode> {
        CurrencyCode::parse(raw, &self.currency_pattern)
    }

    /// Accepts finite amounts in `[0, max_amount]`. `-0.0` comes back as `0.0`.
    pub fn validate_amount(&self, amount: f64) -> Result<f64> {
        if amount.is_finite() && (0.0..=self.max_amount).contains(&amount) {
            Ok(amount + 0.0)
        } else {
            Err(ConvertError::Validation(format!(
                "amount must be between 0 and {}, got {}",
                self.max_amount, amount
            )))
        }
    }

    // == Convert ==
    /// Converts `amount` from one currency to another.
    ///
    /// Identical codes short-circuit with rate 1 and touch neither the cache
    /// nor the network. Callers should not start a second conversion before
    /// the previous one resolved.
    pub async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<ConversionResult> {
        let amount = self.validate_amount(amount)?;
        let pair = CurrencyPair::new(self.parse_code(from)?, self.parse_code(to)?);

        if pair.is_identity() {
            return Ok(ConversionResult {
                converted_amount: amount,
                rate: 1.0,
                source: RateSource::Cache,
                updated_at: Utc::now(),
            });
        }

        let cached = {
            let cache = self.cache.read().await;
            cache.entry_at(&pair, Instant::now()).cloned()
        };

        if let Some(entry) = cached {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            debug!(pair = %pair, rate = entry.rate, "Cache hit");
            return Ok(ConversionResult {
                converted_amount: amount * entry.rate,
                rate: entry.rate,
                source: RateSource::Cache,
                updated_at: entry.fetched_at_utc,
            });
        }

        debug!(pair = %pair, "Cache miss");
        let reply = self.coordinator.fetch_rate(&pair, Some(amount)).await?;
        self.cache.write().await.set(pair, reply.rate);

        Ok(ConversionResult {
            converted_amount: reply.converted.unwrap_or(amount * reply.rate),
            rate: reply.rate,
            source: RateSource::Network,
            updated_at: Utc::now(),
        })
    }

    // == Prefetch ==
    /// Warms the cache with every ordered pair of distinct `codes`.
    ///
    /// Invalid codes and failed fetches are logged and skipped. Returns the
    /// number of pairs stored.
    pub async fn prefetch(&self, codes: &[String]) -> usize {
        let mut valid: Vec<CurrencyCode> = Vec::new();
        for raw in codes {
            match self.parse_code(raw) {
                Ok(code) if !valid.contains(&code) => valid.push(code),
                Ok(_) => {}
                Err(err) => warn!(code = %raw, error = %err, "Skipping prefetch code"),
            }
        }

        let pairs: Vec<CurrencyPair> = valid
            .iter()
            .flat_map(|from| {
                valid
                    .iter()
                    .filter(move |to| *to != from)
                    .map(move |to| CurrencyPair::new(from.clone(), to.clone()))
            })
            .collect();

        let fetches = pairs.iter().map(|pair| async move {
            (pair, self.coordinator.fetch_rate(pair, None).await)
        });
        let results = futures::future::join_all(fetches).await;

        let mut stored = 0;
        let mut cache = self.cache.write().await;
        for (pair, result) in results {
            match result {
                Ok(reply) => {
                    cache.set(pair.clone(), reply.rate);
                    stored += 1;
                }
                Err(err) => warn!(pair = %pair, error = %err, "Prefetch failed"),
            }
        }

        info!(stored, requested = pairs.len(), "Prefetch finished");
        stored
    }

    // == Report ==
    /// Snapshot of the observability counters. Never fails.
    pub async fn report(&self) -> ConversionReport {
        let fetch = self.coordinator.stats().await;
        let (cache_size, evictions) = {
            let cache = self.cache.read().await;
            (cache.len(), cache.evictions())
        };

        ConversionReport::new(
            fetch,
            self.cache_hits.load(Ordering::Relaxed),
            cache_size,
            evictions,
            self.coordinator.pending_len().await,
        )
    }

    // == Teardown ==
    /// Cancels in-flight fetches, then drops every cached rate.
    pub async fn teardown(&self) {
        self.coordinator.clear_pending().await;
        self.cache.write().await.clear();
        info!("Conversion service torn down");
    }
}
