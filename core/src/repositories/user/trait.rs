//! User repository trait defining the interface for user profile lookup.
//!
//! The desktop login flow only needs to resolve a user ID to a full profile,
//! so the contract is read-only.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User lookups
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use uuid::Uuid;
/// use dp_core::repositories::UserRepository;
/// use dp_core::domain::entities::user::User;
/// use dp_core::errors::DomainError;
///
/// struct DirectoryClient;
///
/// #[async_trait]
/// impl UserRepository for DirectoryClient {
///     async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
///         Ok(None)
///     }
/// }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user found with given ID
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
}
