//! fx_relay - A currency conversion service
//!
//! Serves conversions over HTTP, backed by a rate cache and a de-duplicating
//! fetch coordinator.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fx_relay::api::{create_router, AppState};
use fx_relay::{spawn_prefetch_task, spawn_sweep_task, Config};

/// Main entry point for the conversion server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the conversion service
/// 4. Optionally warm the cache in the background
/// 5. Start background rate sweep task
/// 6. Start HTTP server on configured port
/// 7. On SIGINT/SIGTERM, stop the sweep and tear the service down
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fx_relay=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting fx_relay conversion server");

    let config = Config::from_env();
    if config.api_key.is_empty() {
        warn!("EXCHANGE_API_KEY is not set, upstream calls will be rejected");
    }
    info!(
        "Configuration loaded: cache_duration={}s, cache_size_limit={}, timeout={}s, retries={}, port={}",
        config.cache_duration,
        config.cache_size_limit,
        config.request_timeout,
        config.retry_count,
        config.server_port
    );

    let state = AppState::from_config(&config)?;
    let service = state.service.clone();

    let prefetch_handle = (!config.prefetch_currencies.is_empty())
        .then(|| spawn_prefetch_task(service.clone(), config.prefetch_currencies.clone()));

    let sweep_handle = spawn_sweep_task(service.cache(), config.sweep_interval());
    info!("Background sweep task started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(handle) = prefetch_handle {
        handle.abort();
    }
    sweep_handle.abort();
    service.teardown().await;
    info!("Server shutdown complete");

    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
