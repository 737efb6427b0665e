//! Currency Codes
//!
//! Validated currency codes and the ordered pairs used as cache keys.

use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::error::{ConvertError, Result};

// == Currency Code ==
/// A currency code that matched the configured pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Validates `raw` against `pattern`. No case folding is applied.
    pub fn parse(raw: &str, pattern: &Regex) -> Result<Self> {
        if pattern.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ConvertError::Validation(format!(
                "invalid currency code '{}'",
                raw
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Currency Pair ==
/// Ordered (from, to) pair. `USD/EUR` and `EUR/USD` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(from: CurrencyCode, to: CurrencyCode) -> Self {
        Self { from, to }
    }

    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// Builds a pair from codes already known to be valid. Test helper.
#[cfg(test)]
pub(crate) fn pair(from: &str, to: &str) -> CurrencyPair {
    CurrencyPair::new(CurrencyCode(from.to_string()), CurrencyCode(to.to_string()))
}
