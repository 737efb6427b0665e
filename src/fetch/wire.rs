//! Exchange-rate API wire format
//!
//! Parses and validates replies of the `pair` endpoint.

use serde::Deserialize;

use crate::error::{ConvertError, Result};
use crate::fetch::HttpResponse;

/// JSON body of a `pair` reply. Every field is optional so that shape
/// problems surface as validation errors instead of parse errors.
#[derive(Debug, Clone, Deserialize)]
pub struct PairReply {
    pub result: Option<String>,
    pub conversion_rate: Option<serde_json::Value>,
    pub conversion_result: Option<serde_json::Value>,
    #[serde(rename = "error-type")]
    pub error_type: Option<String>,
}

/// A validated rate reply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateResponse {
    /// Target units per source unit
    pub rate: f64,
    /// Converted amount, present when an amount was requested
    pub converted: Option<f64>,
}

/// Classifies a raw reply.
///
/// An API error body wins over the status code; a non-2xx reply without one
/// is a network failure (retryable); a 2xx reply must carry a valid rate.
pub fn parse_reply(response: &HttpResponse, amount_requested: bool) -> Result<RateResponse> {
    let reply = serde_json::from_str::<PairReply>(&response.body).ok();

    if let Some(error_type) = reply.as_ref().and_then(api_error) {
        return Err(classify_api_error(error_type));
    }

    if !response.is_success() {
        return Err(ConvertError::Network(format!("HTTP {}", response.status)));
    }

    let reply = reply.ok_or_else(|| {
        ConvertError::InvalidResponse("response body is not a JSON object".to_string())
    })?;

    validate(&reply, amount_requested)
}

fn api_error(reply: &PairReply) -> Option<&str> {
    match reply.result.as_deref() {
        Some("success") => None,
        _ => reply.error_type.as_deref(),
    }
}

fn classify_api_error(error_type: &str) -> ConvertError {
    match error_type {
        "unsupported-code" => ConvertError::UnsupportedCurrency(error_type.to_string()),
        "quota-reached" => ConvertError::RateLimited(error_type.to_string()),
        other => ConvertError::InvalidResponse(format!("API reported '{}'", other)),
    }
}

fn validate(reply: &PairReply, amount_requested: bool) -> Result<RateResponse> {
    if reply.result.as_deref() != Some("success") {
        return Err(ConvertError::InvalidResponse(format!(
            "unexpected result {:?}",
            reply.result
        )));
    }

    let rate = number(reply.conversion_rate.as_ref())
        .filter(|rate| rate.is_finite() && *rate > 0.0)
        .ok_or_else(|| {
            ConvertError::InvalidResponse("missing or invalid conversion_rate".to_string())
        })?;

    let converted = number(reply.conversion_result.as_ref());
    if amount_requested && converted.is_none() {
        return Err(ConvertError::InvalidResponse(
            "missing or invalid conversion_result".to_string(),
        ));
    }

    Ok(RateResponse { rate, converted })
}

fn number(value: Option<&serde_json::Value>) -> Option<f64> {
    value.and_then(serde_json::Value::as_f64)
}
