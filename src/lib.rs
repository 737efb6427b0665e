//! fx_relay - A currency conversion service
//!
//! Caches exchange rates with time-based expiry, de-duplicates concurrent
//! fetches of the same pair and retries failed fetches with backoff.

pub mod api;
pub mod cache;
pub mod config;
pub mod currency;
pub mod error;
pub mod fetch;
pub mod format;
pub mod models;
pub mod service;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::ConvertError;
pub use service::ConversionService;
pub use tasks::{spawn_prefetch_task, spawn_sweep_task};
