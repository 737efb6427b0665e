//! Cache Module
//!
//! Provides in-memory rate caching with time-based expiry and insertion-order eviction.

mod entry;
mod order;
mod store;


// Re-export public types
pub use entry::RateEntry;
pub use order::InsertionOrder;
pub use store::RateCache;

use std::sync::Arc;
use tokio::sync::RwLock;

/// Rate cache shared between the conversion service and the sweep task.
pub type SharedRateCache = Arc<RwLock<RateCache>>;
