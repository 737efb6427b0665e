//! Response DTOs for the conversion API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::currency::CurrencyCode;
use crate::format::{conversion_line, rate_line};
use crate::service::{ConversionResult, RateSource};

/// Response body for the convert operation (GET /convert)
#[derive(Debug, Clone, Serialize)]
pub struct ConvertResponse {
    pub amount: f64,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub converted_amount: f64,
    pub rate: f64,
    pub source: RateSource,
    /// e.g. "100.00 USD = 92.00 EUR"
    pub display: String,
    /// e.g. "1 USD = 0.9200 EUR"
    pub rate_display: String,
    /// When the rate was fetched, ISO 8601
    pub updated_at: String,
}

impl ConvertResponse {
    /// Creates a new ConvertResponse from a service result
    pub fn new(amount: f64, from: CurrencyCode, to: CurrencyCode, result: ConversionResult) -> Self {
        Self {
            display: conversion_line(amount, &from, result.converted_amount, &to),
            rate_display: rate_line(result.rate, &from, &to),
            updated_at: result.updated_at.to_rfc3339(),
            amount,
            from,
            to,
            converted_amount: result.converted_amount,
            rate: result.rate,
            source: result.source,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
    /// Machine-readable error kind
    pub kind: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind: kind.into(),
        }
    }
}
