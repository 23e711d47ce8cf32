//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::{
    extract_chinese_message, extract_english_message, DesktopTokenError, DesktopTokenResult,
};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Resource already exists: {resource}")]
    AlreadyExists { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    DesktopToken(#[from] DesktopTokenError),
}
