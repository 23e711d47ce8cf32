//! Desktop token route handlers
//!
//! This module contains the three steps of the desktop sign-in handshake:
//! - Registering a token issued by a desktop client
//! - Binding the token to the signed-in browser user
//! - Resolving the token to that user from the desktop client

pub mod authenticate;
pub mod create;
pub mod validate;

pub use authenticate::authenticate_desktop_token;
pub use create::create_desktop_token;
pub use validate::validate_desktop_token;
