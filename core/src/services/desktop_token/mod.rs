//! Desktop token service module
//!
//! This module handles the desktop sign-in handshake:
//! - Issuing pairing tokens for unauthenticated desktop clients
//! - Binding a token to the user of an authenticated browser session
//! - Validating a token and handing the bound user to the desktop client
//! - Fire-and-forget deletion of consumed, expired or orphaned tokens
//! - Periodic sweeping of stale tokens

mod cleanup;
mod clock;
mod runner;
mod service;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, DesktopTokenCleanupService, TokenCleanupConfig};
pub use clock::{Clock, FixedClock, SystemClock};
pub use runner::{CleanupJob, ManualTaskRunner, TaskRunner, TokioTaskRunner};
pub use service::DesktopTokenService;
