//! Request Coordinator
//!
//! De-duplicates identical in-flight rate requests and runs each fetch with a
//! per-attempt timeout and exponential backoff between attempts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::currency::CurrencyPair;
use crate::error::{ConvertError, Result};
use crate::fetch::wire::{parse_reply, RateResponse};
use crate::fetch::{FetchStats, RateTransport, RetryPolicy};

type SharedFetch = Shared<BoxFuture<'static, Result<RateResponse>>>;

// == Request Key ==
/// Identity of a fetch: the pair plus the exact requested amount, if any.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pair: CurrencyPair,
    amount_bits: Option<u64>,
}

impl RequestKey {
    pub fn new(pair: &CurrencyPair, amount: Option<f64>) -> Self {
        Self {
            pair: pair.clone(),
            amount_bits: amount.map(f64::to_bits),
        }
    }
}

/// An in-flight fetch joined by every caller with the same key.
struct PendingRequest {
    id: u64,
    fetch: SharedFetch,
    abort: AbortHandle,
}

struct Inner {
    transport: Arc<dyn RateTransport>,
    base_url: String,
    api_key: String,
    policy: RetryPolicy,
    pending: Mutex<HashMap<RequestKey, PendingRequest>>,
    next_id: AtomicU64,
    stats: Mutex<FetchStats>,
}

// == Request Coordinator ==
/// Shared entry point for rate fetches. Cloning shares the pending map.
#[derive(Clone)]
pub struct RequestCoordinator {
    inner: Arc<Inner>,
}

impl RequestCoordinator {
    /// Creates a coordinator.
    ///
    /// # Arguments
    /// * `transport` - Network seam used for every attempt
    /// * `base_url` - API base URL, e.g. `https://v6.exchangerate-api.com/v6`
    /// * `api_key` - Key inserted into the request path
    /// * `policy` - Attempt count, backoff and per-attempt timeout
    pub fn new(
        transport: Arc<dyn RateTransport>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                base_url: base_url.into().trim_end_matches('/').to_string(),
                api_key: api_key.into(),
                policy,
                pending: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
                stats: Mutex::new(FetchStats::new()),
            }),
        }
    }

    // == Fetch Rate ==
    /// Fetches the rate for `pair`, optionally converting `amount` server side.
    ///
    /// If an identical request is already in flight the caller joins it and
    /// receives the same outcome; otherwise a new fetch is started.
    pub async fn fetch_rate(
        &self,
        pair: &CurrencyPair,
        amount: Option<f64>,
    ) -> Result<RateResponse> {
        let key = RequestKey::new(pair, amount);

        let fetch = {
            let mut pending = self.inner.pending.lock().await;
            match pending.get(&key) {
                Some(existing) => {
                    debug!(pair = %pair, "Joining in-flight rate request");
                    existing.fetch.clone()
                }
                None => {
                    let request = self.start(key.clone(), pair.clone(), amount);
                    let fetch = request.fetch.clone();
                    pending.insert(key, request);
                    fetch
                }
            }
        };

        fetch.await
    }

    /// Spawns the fetch task. Called with the pending map locked, so the
    /// task's own removal of its key always happens after the insert.
    fn start(&self, key: RequestKey, pair: CurrencyPair, amount: Option<f64>) -> PendingRequest {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let inner = Arc::clone(&self.inner);

        let task = tokio::spawn(async move {
            let started = Instant::now();
            let outcome = inner.fetch_with_retry(&pair, amount).await;

            inner
                .stats
                .lock()
                .await
                .record_call(started.elapsed(), outcome.is_err());

            let mut pending = inner.pending.lock().await;
            if pending.get(&key).is_some_and(|p| p.id == id) {
                pending.remove(&key);
            }

            outcome
        });

        let abort = task.abort_handle();
        let fetch = async move {
            task.await.unwrap_or_else(|e| {
                Err(ConvertError::Network(if e.is_cancelled() {
                    "rate request cancelled".to_string()
                } else {
                    format!("rate request task failed: {}", e)
                }))
            })
        }
        .boxed()
        .shared();

        PendingRequest { id, fetch, abort }
    }

    // == Stats ==
    /// Returns a snapshot of the fetch counters.
    pub async fn stats(&self) -> FetchStats {
        self.inner.stats.lock().await.clone()
    }

    /// Number of distinct requests currently in flight.
    pub async fn pending_len(&self) -> usize {
        self.inner.pending.lock().await.len()
    }

    // == Clear Pending ==
    /// Cancels every in-flight fetch. Joined callers receive a network error.
    pub async fn clear_pending(&self) {
        let mut pending = self.inner.pending.lock().await;
        for (_, request) in pending.drain() {
            request.abort.abort();
        }
    }
}

impl Inner {
    fn url_for(&self, pair: &CurrencyPair, amount: Option<f64>) -> String {
        let mut url = format!(
            "{}/{}/pair/{}/{}",
            self.base_url, self.api_key, pair.from, pair.to
        );
        if let Some(amount) = amount {
            url.push_str(&format!("/{}", amount));
        }
        url
    }

    async fn fetch_with_retry(&self, pair: &CurrencyPair, amount: Option<f64>) -> Result<RateResponse> {
        let url = self.url_for(pair, amount);
        let attempts = self.policy.total_attempts();
        let mut attempt = 0;

        loop {
            let err = match self.attempt(&url, amount.is_some()).await {
                Ok(reply) => {
                    info!(pair = %pair, rate = reply.rate, attempt = attempt + 1, "Fetched rate");
                    return Ok(reply);
                }
                Err(err) => err,
            };

            if !err.is_retryable() {
                warn!(pair = %pair, error = %err, "Rate fetch rejected");
                return Err(err);
            }

            if attempt + 1 >= attempts {
                warn!(pair = %pair, attempts, error = %err, "Rate fetch failed, giving up");
                return Err(err.into_final());
            }

            let delay = self.policy.delay_for_attempt(attempt);
            warn!(
                pair = %pair,
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Rate fetch failed, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// One bounded attempt. Hitting the timeout drops the transport future,
    /// which cancels the underlying call.
    async fn attempt(&self, url: &str, amount_requested: bool) -> Result<RateResponse> {
        let timeout = self.policy.timeout;
        let response = tokio::time::timeout(timeout, self.transport.get(url))
            .await
            .map_err(|_| ConvertError::Timeout(timeout))??;

        parse_reply(&response, amount_requested)
    }
}
