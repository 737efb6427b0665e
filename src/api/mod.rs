//! API Module
//!
//! HTTP handlers and routing for the conversion REST API.
//!
//! # Endpoints
//! - `GET /convert?amount=&from=&to=` - Convert an amount
//! - `GET /swap?amount=&from=&to=` - Convert with the currencies exchanged
//! - `GET /stats` - Service counters
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
