//! Desktop token cleanup service for periodic removal of stale tokens
//!
//! Request-driven deletions only catch tokens somebody asks about again.
//! Tokens that were issued and then abandoned are removed here once they
//! fall outside the expiry window.

use std::sync::Arc;

use chrono::Duration;
use tracing::{error, info, warn};

use dp_shared::config::DesktopTokenConfig;

use crate::domain::entities::desktop_token::{expiry_cutoff, DESKTOP_TOKEN_TTL_SECONDS};
use crate::errors::DomainError;
use crate::repositories::DesktopTokenRepository;

use super::clock::{Clock, SystemClock};

/// Configuration for the desktop token cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Age after which a token is considered stale
    pub ttl: Duration,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600, // Run every hour
            ttl: Duration::seconds(DESKTOP_TOKEN_TTL_SECONDS),
            enabled: true,
        }
    }
}

impl From<&DesktopTokenConfig> for TokenCleanupConfig {
    fn from(config: &DesktopTokenConfig) -> Self {
        Self {
            interval_seconds: config.cleanup_interval_seconds,
            ttl: config.ttl(),
            enabled: config.cleanup_enabled,
        }
    }
}

/// Service for sweeping expired desktop tokens
pub struct DesktopTokenCleanupService<R: DesktopTokenRepository + 'static> {
    repository: Arc<R>,
    config: TokenCleanupConfig,
    clock: Arc<dyn Clock>,
}

impl<R: DesktopTokenRepository> DesktopTokenCleanupService<R> {
    /// Create a new cleanup service
    pub fn new(repository: Arc<R>, config: TokenCleanupConfig) -> Self {
        Self {
            repository,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Run a single cleanup cycle
    ///
    /// # Returns
    /// * `Ok(CleanupResult)` - Summary of the cycle; store errors are recorded in it
    /// * `Err(DomainError)` - Reserved for failures that abort the cycle
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let cutoff = expiry_cutoff(self.clock.now(), self.config.ttl);
        info!(cutoff, "Starting desktop token cleanup cycle");

        let mut result = CleanupResult {
            cutoff,
            ..CleanupResult::default()
        };

        match self.repository.delete_older_than(cutoff).await {
            Ok(count) => {
                result.expired_tokens_deleted = count;
                info!("Deleted {} expired desktop tokens", count);
            }
            Err(e) => {
                error!("Failed to cleanup expired desktop tokens: {}", e);
                result.errors.push(format!("Desktop token cleanup error: {}", e));
            }
        }

        Ok(result)
    }

    /// Start the cleanup service as a background task
    ///
    /// This spawns a tokio task that runs cleanup at regular intervals
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("Desktop token cleanup service is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        tokio::spawn(async move {
            info!(
                "Desktop token cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                match self.run_cleanup().await {
                    Ok(result) => {
                        if !result.errors.is_empty() {
                            warn!("Cleanup completed with errors: {:?}", result.errors);
                        }
                    }
                    Err(e) => {
                        error!("Desktop token cleanup cycle failed: {}", e);
                    }
                }
            }
        });
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Creation time below which tokens were removed
    pub cutoff: i64,
    /// Number of expired tokens deleted
    pub expired_tokens_deleted: u64,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
