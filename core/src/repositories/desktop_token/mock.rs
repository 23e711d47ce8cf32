//! Mock implementation of DesktopTokenRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::desktop_token::DesktopToken;
use crate::errors::DomainError;

use super::r#trait::DesktopTokenRepository;

/// Mock desktop token repository for testing
pub struct MockDesktopTokenRepository {
    tokens: Arc<RwLock<HashMap<String, DesktopToken>>>,
    failing: AtomicBool,
}

impl MockDesktopTokenRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail with an internal error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Read a record regardless of age
    pub async fn get(&self, token: &str) -> Option<DesktopToken> {
        self.tokens.read().await.get(token).cloned()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::Internal {
                message: "Mock store unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockDesktopTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DesktopTokenRepository for MockDesktopTokenRepository {
    async fn insert(&self, token: &DesktopToken) -> Result<(), DomainError> {
        self.check_available()?;
        let mut tokens = self.tokens.write().await;

        if tokens.contains_key(&token.token) {
            return Err(DomainError::AlreadyExists {
                resource: "desktop_token".to_string(),
            });
        }

        tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn find_by_token(
        &self,
        token: &str,
        min_created_at: i64,
    ) -> Result<Option<DesktopToken>, DomainError> {
        self.check_available()?;
        let tokens = self.tokens.read().await;
        Ok(tokens
            .get(token)
            .filter(|t| t.is_fresh(min_created_at))
            .cloned())
    }

    async fn set_user_id(
        &self,
        token: &str,
        min_created_at: i64,
        user_id: Uuid,
    ) -> Result<bool, DomainError> {
        self.check_available()?;
        let mut tokens = self.tokens.write().await;

        match tokens.get_mut(token) {
            Some(record) if record.is_fresh(min_created_at) && record.user_id.is_none() => {
                record.user_id = Some(user_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, token: &str) -> Result<(), DomainError> {
        self.check_available()?;
        self.tokens.write().await.remove(token);
        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: Uuid) -> Result<u64, DomainError> {
        self.check_available()?;
        let mut tokens = self.tokens.write().await;
        let initial_count = tokens.len();

        tokens.retain(|_, t| t.user_id != Some(user_id));

        Ok((initial_count - tokens.len()) as u64)
    }

    async fn delete_older_than(&self, min_created_at: i64) -> Result<u64, DomainError> {
        self.check_available()?;
        let mut tokens = self.tokens.write().await;
        let initial_count = tokens.len();

        tokens.retain(|_, t| t.is_fresh(min_created_at));

        Ok((initial_count - tokens.len()) as u64)
    }
}
