//! Request DTOs for the conversion API
//!
//! Defines the structure of incoming query strings.

use serde::Deserialize;

/// Query for the convert operation (GET /convert)
///
/// # Fields
/// - `amount`: Amount in the source currency
/// - `from`: Source currency code
/// - `to`: Target currency code
///
/// Codes are passed through verbatim; pattern checks happen in the service.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertQuery {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

impl ConvertQuery {
    /// The same query with the currencies exchanged.
    pub fn swapped(self) -> Self {
        Self {
            amount: self.amount,
            from: self.to,
            to: self.from,
        }
    }
}
