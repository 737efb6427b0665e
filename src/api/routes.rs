//! API Routes
//!
//! Configures the Axum router with all conversion endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{convert_handler, health_handler, stats_handler, swap_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /convert` - Convert an amount
/// - `GET /swap` - Convert with the currencies exchanged
/// - `GET /stats` - Service counters
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin, so a browser widget can call the service
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/convert", get(convert_handler))
        .route("/swap", get(swap_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
