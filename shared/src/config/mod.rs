//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - JWT verification of browser sessions
//! - `database` - Database connection and pool configuration
//! - `desktop_token` - Desktop pairing token lifetime and cleanup
//! - `environment` - Environment detection
//! - `server` - HTTP server and CORS configuration

pub mod auth;
pub mod database;
pub mod desktop_token;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::JwtConfig;
pub use database::DatabaseConfig;
pub use desktop_token::DesktopTokenConfig;
pub use environment::Environment;
pub use server::{CorsConfig, ServerConfig};

/// Which token store backs the running server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// MySQL through sqlx
    Mysql,
    /// Process-local maps, lost on restart
    Memory,
}

impl Default for StorageBackend {
    fn default() -> Self {
        StorageBackend::Mysql
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(StorageBackend::Mysql),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

impl StorageBackend {
    /// Read `STORAGE_BACKEND`, falling back to MySQL
    pub fn from_env() -> Self {
        std::env::var("STORAGE_BACKEND")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT verification of browser sessions
    pub jwt: JwtConfig,

    /// Desktop pairing token policy
    pub desktop_token: DesktopTokenConfig,

    /// Token store backend
    #[serde(default)]
    pub storage: StorageBackend,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
            desktop_token: DesktopTokenConfig::default(),
            storage: StorageBackend::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let cors = if environment.is_production() {
            CorsConfig::from_env()
        } else {
            CorsConfig::development()
        };

        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            desktop_token: DesktopTokenConfig::from_env(),
            storage: StorageBackend::from_env(),
            cors,
        }
    }
}
