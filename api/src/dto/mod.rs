//! Request and response bodies

pub mod desktop_token;
pub mod error;

pub use desktop_token::*;
pub use error::{ErrorResponse, ErrorResponseExt};
