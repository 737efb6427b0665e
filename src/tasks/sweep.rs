//! Rate Sweep Task
//!
//! Background task that periodically removes expired rates, bounding memory
//! even when nothing reads the cache.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::SharedRateCache;

/// Shortest accepted period; `interval_at` panics on zero.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Spawns a background task that sweeps expired rates every `interval`.
///
/// The first sweep runs one full interval after spawning. Sweeping never
/// fails; the task runs until aborted.
///
/// # Arguments
/// * `cache` - Shared rate cache
/// * `interval` - Time between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, to be aborted on shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_sweep_task(service.cache(), Duration::from_secs(60));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweep_task(cache: SharedRateCache, interval: Duration) -> JoinHandle<()> {
    let interval = interval.max(MIN_SWEEP_INTERVAL);

    tokio::spawn(async move {
        info!(
            "Starting rate sweep task with interval of {} seconds",
            interval.as_secs_f64()
        );

        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let now = ticker.tick().await;

            let removed = cache.write().await.sweep(now);

            if removed > 0 {
                info!("Rate sweep: removed {} expired rates", removed);
            } else {
                debug!("Rate sweep: no expired rates found");
            }
        }
    })
}
