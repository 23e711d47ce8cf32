//! In-memory repository implementations
//!
//! Process-local stores for development runs and tests. Data is lost when
//! the process exits.

pub mod desktop_token_store;
pub mod user_store;

#[cfg(test)]
mod tests;

pub use desktop_token_store::InMemoryDesktopTokenRepository;
pub use user_store::InMemoryUserRepository;
