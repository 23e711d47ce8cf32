//! Desktop token repository trait defining the interface for pairing token persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::desktop_token::DesktopToken;
use crate::errors::DomainError;

/// Repository trait for DesktopToken persistence operations
///
/// Freshness is always expressed as `min_created_at`: a record qualifies only
/// when its `created_at` is at or after that epoch-second cutoff. Passing
/// [`ANY_AGE`](crate::domain::entities::desktop_token::ANY_AGE) disables the
/// filter.
///
/// # Atomicity
/// `find_by_token` and `set_user_id` must evaluate the existence and
/// freshness predicates in a single store-side operation, so concurrent
/// binds, reads and deletes never act on a record that another caller has
/// already claimed or removed.
///
/// # Idempotency
/// Deleting a token that no longer exists is not an error.
#[async_trait]
pub trait DesktopTokenRepository: Send + Sync {
    /// Insert a new token record
    ///
    /// # Returns
    /// * `Ok(())` - Token stored
    /// * `Err(DomainError::AlreadyExists)` - A record with the same token exists
    /// * `Err(DomainError)` - Store failure
    ///
    /// # Example
    /// ```no_run
    /// # use dp_core::repositories::DesktopTokenRepository;
    /// # use dp_core::domain::entities::desktop_token::DesktopToken;
    /// # async fn example(repo: &impl DesktopTokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let token = DesktopToken::new("d0c4f1e2", chrono::Utc::now().timestamp());
    /// repo.insert(&token).await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn insert(&self, token: &DesktopToken) -> Result<(), DomainError>;

    /// Find a token created at or after `min_created_at`
    ///
    /// # Returns
    /// * `Ok(Some(DesktopToken))` - A fresh record exists
    /// * `Ok(None)` - No record, or the record is older than the cutoff
    /// * `Err(DomainError)` - Store failure
    async fn find_by_token(
        &self,
        token: &str,
        min_created_at: i64,
    ) -> Result<Option<DesktopToken>, DomainError>;

    /// Bind `user_id` to an unbound token created at or after `min_created_at`
    ///
    /// # Returns
    /// * `Ok(true)` - The token is now bound to the user
    /// * `Ok(false)` - No fresh, unbound record matched
    /// * `Err(DomainError)` - Store failure
    async fn set_user_id(
        &self,
        token: &str,
        min_created_at: i64,
        user_id: Uuid,
    ) -> Result<bool, DomainError>;

    /// Delete a single token; no-op if absent
    async fn delete(&self, token: &str) -> Result<(), DomainError>;

    /// Delete every token bound to `user_id`
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of records removed
    async fn delete_by_user_id(&self, user_id: Uuid) -> Result<u64, DomainError>;

    /// Delete every token created before `min_created_at`
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of records removed
    async fn delete_older_than(&self, min_created_at: i64) -> Result<u64, DomainError>;
}
