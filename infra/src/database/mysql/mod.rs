//! MySQL-specific database implementations
//!
//! This module contains MySQL implementations of repository traits
//! using SQLx for database operations.

pub mod desktop_token_repository_impl;
pub mod user_repository_impl;

// Re-export the MySQL implementations
pub use desktop_token_repository_impl::MySqlDesktopTokenRepository;
pub use user_repository_impl::MySqlUserRepository;
