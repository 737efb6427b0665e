//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the service is up.
//!
//! # Tasks
//! - Rate sweep: removes expired rates at a fixed interval
//! - Prefetch: warms the cache once at startup without delaying the listener

mod prefetch;
mod sweep;

pub use prefetch::spawn_prefetch_task;
pub use sweep::spawn_sweep_task;
