//! Desktop pairing token configuration

use serde::{Deserialize, Serialize};

/// Longest accepted token lifetime (one day); larger values are capped
pub const MAX_TTL_SECONDS: i64 = 24 * 60 * 60;

/// Lifetime and cleanup policy for desktop pairing tokens
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DesktopTokenConfig {
    /// How long a token may be bound or validated after issuance, in seconds
    pub ttl_seconds: i64,

    /// How often the stale-token sweep runs, in seconds
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,

    /// Whether the periodic sweep runs at all
    #[serde(default = "default_cleanup_enabled")]
    pub cleanup_enabled: bool,

    /// Upper bound on deletion jobs running at the same time
    #[serde(default = "default_max_concurrent_cleanups")]
    pub max_concurrent_cleanups: usize,
}

impl Default for DesktopTokenConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 180, // 3 minutes
            cleanup_interval_seconds: default_cleanup_interval(),
            cleanup_enabled: default_cleanup_enabled(),
            max_concurrent_cleanups: default_max_concurrent_cleanups(),
        }
    }
}

impl DesktopTokenConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let ttl_seconds = std::env::var("DESKTOP_TOKEN_TTL_SECONDS")
            .unwrap_or_else(|_| "180".to_string())
            .parse()
            .unwrap_or(180);
        let cleanup_interval_seconds = std::env::var("DESKTOP_TOKEN_CLEANUP_INTERVAL_SECONDS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .unwrap_or(3600);
        let cleanup_enabled = std::env::var("DESKTOP_TOKEN_CLEANUP_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);
        let max_concurrent_cleanups = std::env::var("DESKTOP_TOKEN_MAX_CONCURRENT_CLEANUPS")
            .unwrap_or_else(|_| "16".to_string())
            .parse()
            .unwrap_or(16);

        Self {
            ttl_seconds,
            cleanup_interval_seconds,
            cleanup_enabled,
            max_concurrent_cleanups,
        }
    }

    /// Set the token lifetime in minutes
    pub fn with_ttl_minutes(mut self, minutes: i64) -> Self {
        self.ttl_seconds = minutes.saturating_mul(60);
        self
    }

    /// Whether `ttl_seconds` exceeds [`MAX_TTL_SECONDS`] and will be capped
    pub fn is_ttl_capped(&self) -> bool {
        self.ttl_seconds > MAX_TTL_SECONDS
    }

    /// Token lifetime as a chrono duration, capped at [`MAX_TTL_SECONDS`]
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.ttl_seconds.clamp(-MAX_TTL_SECONDS, MAX_TTL_SECONDS))
    }
}

fn default_cleanup_interval() -> u64 {
    3600 // 1 hour
}

fn default_cleanup_enabled() -> bool {
    true
}

fn default_max_concurrent_cleanups() -> usize {
    16
}
