//! Route handlers
//!
//! - `desktop_token` - Desktop sign-in pairing endpoints
//! - `health` - Liveness and store health

pub mod desktop_token;
pub mod health;
