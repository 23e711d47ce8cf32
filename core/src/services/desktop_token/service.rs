//! Desktop token lifecycle service.
//!
//! Implements the three steps of the desktop sign-in handshake:
//!
//! 1. The desktop client registers an opaque token ([`DesktopTokenService::create_token`]).
//! 2. A signed-in browser session claims it ([`DesktopTokenService::authenticate_token`]).
//! 3. The desktop client polls until the token resolves to a user
//!    ([`DesktopTokenService::validate_token`]).
//!
//! Deletions triggered along the way are handed to a [`TaskRunner`] and are
//! never awaited by the operation that triggered them.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::desktop_token::{
    expiry_cutoff, redact_token, DesktopToken, ANY_AGE,
};
use crate::domain::entities::user::User;
use crate::errors::{DesktopTokenError, DesktopTokenResult, DomainError};
use crate::repositories::{DesktopTokenRepository, UserRepository};

use super::clock::{Clock, SystemClock};
use super::runner::TaskRunner;

/// Token lifecycle manager
pub struct DesktopTokenService<R, U>
where
    R: DesktopTokenRepository,
    U: UserRepository,
{
    token_repository: Arc<R>,
    user_repository: Arc<U>,
    task_runner: Arc<dyn TaskRunner>,
    clock: Arc<dyn Clock>,
}

impl<R, U> DesktopTokenService<R, U>
where
    R: DesktopTokenRepository + 'static,
    U: UserRepository + 'static,
{
    /// Create a new service using the system clock
    pub fn new(
        token_repository: Arc<R>,
        user_repository: Arc<U>,
        task_runner: Arc<dyn TaskRunner>,
    ) -> Self {
        Self {
            token_repository,
            user_repository,
            task_runner,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Current time according to the service clock, in epoch seconds
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Register a new desktop token issued at `created_at`
    ///
    /// Any existing record with the same token blocks issuance, however old
    /// it is. Expired records are only removed on a best-effort basis, so an
    /// unswept leftover still counts.
    ///
    /// # Errors
    /// * `Collision` - a record with this token already exists
    /// * `StoreFailure` - the token store could not be read or written
    pub async fn create_token(&self, token: &str, created_at: i64) -> DesktopTokenResult<()> {
        let existing = self
            .token_repository
            .find_by_token(token, ANY_AGE)
            .await
            .map_err(|e| DesktopTokenError::store_failure("create_token", e))?;

        if existing.is_some() {
            debug!(token = redact_token(token), "Desktop token already exists");
            return Err(DesktopTokenError::Collision);
        }

        match self
            .token_repository
            .insert(&DesktopToken::new(token, created_at))
            .await
        {
            Ok(()) => {
                info!(token = redact_token(token), created_at, "Desktop token created");
                Ok(())
            }
            Err(DomainError::AlreadyExists { .. }) => Err(DesktopTokenError::Collision),
            Err(e) => Err(DesktopTokenError::store_failure("create_token", e)),
        }
    }

    /// Register a new desktop token issued now
    pub async fn issue_token(&self, token: &str) -> DesktopTokenResult<DesktopToken> {
        let created_at = self.clock.now();
        self.create_token(token, created_at).await?;
        Ok(DesktopToken::new(token, created_at))
    }

    /// Bind `user` to the token if it is unclaimed and younger than `expiry_window`
    ///
    /// The check and the bind happen in one conditional store call. When
    /// nothing matched, deletion of the token is scheduled in the background.
    ///
    /// # Errors
    /// * `InvalidOrExpired` - no unclaimed record within the window
    /// * `StoreFailure` - the token store could not be written
    pub async fn authenticate_token(
        &self,
        token: &str,
        expiry_window: Duration,
        user: &User,
    ) -> DesktopTokenResult<()> {
        let cutoff = expiry_cutoff(self.clock.now(), expiry_window);

        let bound = self
            .token_repository
            .set_user_id(token, cutoff, user.id)
            .await
            .map_err(|e| DesktopTokenError::store_failure("authenticate_token", e))?;

        if !bound {
            debug!(
                token = redact_token(token),
                "No claimable desktop token, scheduling deletion"
            );
            self.schedule_delete(token);
            return Err(DesktopTokenError::InvalidOrExpired);
        }

        info!(
            token = redact_token(token),
            user_id = %user.id,
            "Desktop token authenticated"
        );
        Ok(())
    }

    /// Resolve a token to the user who claimed it
    ///
    /// On success every token bound to that user is scheduled for deletion,
    /// so the pairing can be consumed only once. A second call racing that
    /// cleanup may still succeed.
    ///
    /// # Errors
    /// * `Expired` - no record within the window; deletion is scheduled
    /// * `NotYetAuthenticated` - the record exists but nobody claimed it yet
    /// * `UserResolutionFailed` - the bound user cannot be loaded; deletion is scheduled
    /// * `StoreFailure` - the token store could not be read
    pub async fn validate_token(
        &self,
        token: &str,
        expiry_window: Duration,
    ) -> DesktopTokenResult<User> {
        let cutoff = expiry_cutoff(self.clock.now(), expiry_window);

        let record = self
            .token_repository
            .find_by_token(token, cutoff)
            .await
            .map_err(|e| DesktopTokenError::store_failure("validate_token", e))?;

        let record = match record {
            Some(record) => record,
            None => {
                debug!(token = redact_token(token), "Desktop token expired or missing");
                self.schedule_delete(token);
                return Err(DesktopTokenError::Expired);
            }
        };

        let user_id = match record.user_id {
            Some(user_id) => user_id,
            None => return Err(DesktopTokenError::NotYetAuthenticated),
        };

        let user = match self.user_repository.find_by_id(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!(
                    token = redact_token(token),
                    user_id = %user_id,
                    "Desktop token bound to unknown user"
                );
                self.schedule_delete(token);
                return Err(DesktopTokenError::UserResolutionFailed {
                    reason: format!("user {} not found", user_id),
                });
            }
            Err(e) => {
                warn!(
                    token = redact_token(token),
                    user_id = %user_id,
                    error = %e,
                    "Failed to resolve desktop token user"
                );
                self.schedule_delete(token);
                return Err(DesktopTokenError::UserResolutionFailed {
                    reason: e.to_string(),
                });
            }
        };

        self.schedule_delete_by_user(user_id);

        info!(
            token = redact_token(token),
            user_id = %user_id,
            "Desktop token validated"
        );
        Ok(user)
    }

    fn schedule_delete(&self, token: &str) {
        let repository = Arc::clone(&self.token_repository);
        let token = token.to_string();

        self.task_runner.spawn(
            "delete_desktop_token",
            Box::pin(async move {
                if let Err(e) = repository.delete(&token).await {
                    warn!(
                        token = redact_token(&token),
                        error = %e,
                        "Failed to delete desktop token"
                    );
                }
            }),
        );
    }

    fn schedule_delete_by_user(&self, user_id: Uuid) {
        let repository = Arc::clone(&self.token_repository);

        self.task_runner.spawn(
            "delete_user_desktop_tokens",
            Box::pin(async move {
                match repository.delete_by_user_id(user_id).await {
                    Ok(count) => {
                        debug!(user_id = %user_id, count, "Deleted consumed desktop tokens")
                    }
                    Err(e) => warn!(
                        user_id = %user_id,
                        error = %e,
                        "Failed to delete desktop tokens for user"
                    ),
                }
            }),
        );
    }
}
