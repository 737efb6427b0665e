//! Request and Response models for the conversion API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::ConvertQuery;
pub use responses::{ConvertResponse, ErrorResponse, HealthResponse};
