//! Error types for the conversion service
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Convert Error Enum ==
/// Unified error type for rate acquisition and conversion.
///
/// `Clone` because a single fetch outcome is handed to every caller that
/// joined the same pending request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// Invalid amount or currency code
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A single attempt exceeded the request timeout
    #[error("Request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// Transport-level failure (connection, non-2xx, unreadable body)
    #[error("Network error: {0}")]
    Network(String),

    /// The API does not know one of the currency codes
    #[error("Unsupported currency code: {0}")]
    UnsupportedCurrency(String),

    /// The API quota has been used up
    #[error("Rate limit reached: {0}")]
    RateLimited(String),

    /// The transport succeeded but the payload is not a usable rate reply
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl ConvertError {
    /// Stable machine-readable tag for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::Validation(_) => "validation",
            ConvertError::Timeout(_) => "timeout",
            ConvertError::Network(_) => "network",
            ConvertError::UnsupportedCurrency(_) => "unsupported_currency",
            ConvertError::RateLimited(_) => "rate_limited",
            ConvertError::InvalidResponse(_) => "invalid_response",
        }
    }

    /// Whether another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ConvertError::Timeout(_) | ConvertError::Network(_))
    }

    /// Maps an exhausted timeout to the network error callers see.
    pub(crate) fn into_final(self) -> Self {
        match self {
            ConvertError::Timeout(limit) => ConvertError::Network(format!(
                "request timed out after {}s",
                limit.as_secs_f64()
            )),
            other => other,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ConvertError::Validation(_) => StatusCode::BAD_REQUEST,
            ConvertError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ConvertError::Network(_) => StatusCode::BAD_GATEWAY,
            ConvertError::UnsupportedCurrency(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ConvertError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ConvertError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ConvertError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(self.to_string(), self.kind()));

        (self.status(), body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the conversion service.
pub type Result<T> = std::result::Result<T, ConvertError>;
