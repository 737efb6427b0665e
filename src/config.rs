//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use regex::Regex;

/// Default exchange-rate API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";

/// Default currency code pattern: three uppercase letters.
pub const DEFAULT_CURRENCY_PATTERN: &str = "^[A-Z]{3}$";

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the exchange-rate API
    pub api_base_url: String,
    /// API key inserted into every request path
    pub api_key: String,
    /// How long a fetched rate stays usable, in seconds
    pub cache_duration: u64,
    /// Maximum number of cached currency pairs
    pub cache_size_limit: usize,
    /// Per-attempt request timeout in seconds
    pub request_timeout: u64,
    /// Retries after the first failed attempt
    pub retry_count: u32,
    /// Largest amount accepted for conversion
    pub max_amount: f64,
    /// Regex a currency code must match
    pub currency_pattern: String,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Codes whose pairwise rates are fetched at startup
    pub prefetch_currencies: Vec<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `EXCHANGE_API_BASE_URL` - API base URL (default: v6.exchangerate-api.com)
    /// - `EXCHANGE_API_KEY` - API key (default: empty)
    /// - `CACHE_DURATION` - Rate validity in seconds (default: 600)
    /// - `CACHE_SIZE_LIMIT` - Maximum cached pairs (default: 100)
    /// - `REQUEST_TIMEOUT` - Per-attempt timeout in seconds (default: 10)
    /// - `RETRY_COUNT` - Retries after a failed attempt (default: 3)
    /// - `MAX_AMOUNT` - Largest convertible amount (default: 1000000000)
    /// - `CURRENCY_PATTERN` - Currency code regex (default: `^[A-Z]{3}$`)
    /// - `SWEEP_INTERVAL` - Expired-rate sweep frequency in seconds (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `PREFETCH_CURRENCIES` - Comma separated codes to warm up (default: none)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_base_url: env::var("EXCHANGE_API_BASE_URL").unwrap_or(defaults.api_base_url),
            api_key: env::var("EXCHANGE_API_KEY").unwrap_or(defaults.api_key),
            cache_duration: parse_var("CACHE_DURATION").unwrap_or(defaults.cache_duration),
            cache_size_limit: parse_var("CACHE_SIZE_LIMIT").unwrap_or(defaults.cache_size_limit),
            request_timeout: parse_positive("REQUEST_TIMEOUT").unwrap_or(defaults.request_timeout),
            retry_count: parse_var("RETRY_COUNT").unwrap_or(defaults.retry_count),
            max_amount: parse_var("MAX_AMOUNT").unwrap_or(defaults.max_amount),
            currency_pattern: env::var("CURRENCY_PATTERN").unwrap_or(defaults.currency_pattern),
            sweep_interval: parse_positive("SWEEP_INTERVAL").unwrap_or(defaults.sweep_interval),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            prefetch_currencies: env::var("PREFETCH_CURRENCIES")
                .map(|v| parse_list(&v))
                .unwrap_or(defaults.prefetch_currencies),
        }
    }

    /// Compiles the configured currency code pattern.
    pub fn currency_regex(&self) -> Result<Regex, regex::Error> {
        Regex::new(&self.currency_pattern)
    }

    pub fn cache_duration(&self) -> Duration {
        Duration::from_secs(self.cache_duration)
    }

    /// Never zero.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout.max(1))
    }

    /// Never zero; a zero period would stop the sweep task.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: String::new(),
            cache_duration: 600,
            cache_size_limit: 100,
            request_timeout: 10,
            retry_count: 3,
            max_amount: 1_000_000_000.0,
            currency_pattern: DEFAULT_CURRENCY_PATTERN.to_string(),
            sweep_interval: 60,
            server_port: 3000,
            prefetch_currencies: Vec::new(),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Like `parse_var`, but zero falls back to the default as well.
fn parse_positive(name: &str) -> Option<u64> {
    parse_var(name).filter(|v| *v > 0)
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}
