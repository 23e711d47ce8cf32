//! Type definitions shared by the API layer
//!
//! - `language` - Language negotiation for localized messages
//! - `response` - Health check responses

pub mod language;
pub mod response;

pub use language::Language;
pub use response::{HealthResponse, HealthStatus, ServiceHealth};
