//! API Handlers
//!
//! HTTP request handlers for each conversion endpoint.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::config::Config;
use crate::error::{ConvertError, Result};
use crate::fetch::{RateTransport, ReqwestTransport};
use crate::models::{ConvertQuery, ConvertResponse, HealthResponse};
use crate::service::{ConversionReport, ConversionService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: ConversionService,
}

impl AppState {
    /// Creates a new AppState around an existing service.
    pub fn new(service: ConversionService) -> Self {
        Self { service }
    }

    /// Creates a new AppState from configuration, talking to the real API.
    ///
    /// Fails when the HTTP client cannot be built or the currency pattern
    /// does not compile.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::new().context("failed to build HTTP client")?;
        Self::with_transport(config, Arc::new(transport)).context("invalid CURRENCY_PATTERN")
    }

    pub fn with_transport(
        config: &Config,
        transport: Arc<dyn RateTransport>,
    ) -> std::result::Result<Self, regex::Error> {
        Ok(Self::new(ConversionService::from_config(config, transport)?))
    }
}

/// Handler for GET /convert
///
/// Converts `amount` from `from` to `to`.
pub async fn convert_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<ConvertQuery>, QueryRejection>,
) -> Result<Json<ConvertResponse>> {
    let Query(query) = query.map_err(|e| ConvertError::Validation(e.body_text()))?;
    convert(&state.service, query).await
}

/// Handler for GET /swap
///
/// Same as /convert with the two currencies exchanged.
pub async fn swap_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<ConvertQuery>, QueryRejection>,
) -> Result<Json<ConvertResponse>> {
    let Query(query) = query.map_err(|e| ConvertError::Validation(e.body_text()))?;
    convert(&state.service, query.swapped()).await
}

async fn convert(service: &ConversionService, query: ConvertQuery) -> Result<Json<ConvertResponse>> {
    let result = service.convert(query.amount, &query.from, &query.to).await?;

    Ok(Json(ConvertResponse::new(
        query.amount,
        service.parse_code(&query.from)?,
        service.parse_code(&query.to)?,
        result,
    )))
}

/// Handler for GET /stats
///
/// Returns current service counters.
pub async fn stats_handler(State(state): State<AppState>) -> Json<ConversionReport> {
    Json(state.service.report().await)
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
