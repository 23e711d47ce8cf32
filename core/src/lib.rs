//! # DeskPair Core
//!
//! Core business logic and domain layer for the DeskPair backend.
//! This crate contains the desktop pairing token entity, the token lifecycle
//! service, repository interfaces, and the error types shared by the
//! infrastructure and API layers.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
