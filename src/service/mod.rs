//! Service Module
//!
//! The conversion service and its observability report.

mod conversion;
mod report;

pub use conversion::{ConversionResult, ConversionService, RateSource};
pub use report::ConversionReport;
