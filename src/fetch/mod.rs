//! Fetch Module
//!
//! Rate acquisition over the network: transport seam, reply validation,
//! retry policy and request de-duplication.

mod coordinator;
mod retry;
mod stats;
mod transport;
mod wire;

#[cfg(test)]
pub(crate) mod testing;

// Re-export public types
pub use coordinator::{RequestCoordinator, RequestKey};
pub use retry::RetryPolicy;
pub use stats::FetchStats;
pub use transport::{HttpResponse, RateTransport, ReqwestTransport};
pub use wire::{parse_reply, PairReply, RateResponse};
