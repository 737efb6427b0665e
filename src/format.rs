//! Display formatting for amounts and rates.

use crate::currency::CurrencyCode;

/// Abbreviates large values: `1.50M`, `12.35K`, `3.20`, `0.0092`.
pub fn format_amount(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.2}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.2}K", value / 1_000.0)
    } else if value >= 1.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.4}", value)
    }
}

/// `"100.00 USD = 92.00 EUR"`
pub fn conversion_line(amount: f64, from: &CurrencyCode, converted: f64, to: &CurrencyCode) -> String {
    format!(
        "{} {} = {} {}",
        format_amount(amount),
        from,
        format_amount(converted),
        to
    )
}

/// `"1 USD = 0.9200 EUR"`
pub fn rate_line(rate: f64, from: &CurrencyCode, to: &CurrencyCode) -> String {
    format!("1 {} = {} {}", from, format_amount(rate), to)
}
