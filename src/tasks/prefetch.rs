//! Startup Prefetch Task
//!
//! Warms the rate cache in the background so a slow or unreachable rates
//! API cannot hold up server startup.

use tokio::task::JoinHandle;
use tracing::info;

use crate::service::ConversionService;

/// Spawns a one-shot task fetching every ordered pair of `codes`.
///
/// Returns at once. The task resolves to the number of pairs stored and can
/// be aborted on shutdown.
pub fn spawn_prefetch_task(service: ConversionService, codes: Vec<String>) -> JoinHandle<usize> {
    tokio::spawn(async move {
        info!(codes = ?codes, "Starting cache prefetch");
        service.prefetch(&codes).await
    })
}
