//! In-memory desktop token store.
//!
//! Each conditional operation runs under a single write lock, which gives the
//! same check-and-act atomicity as the SQL `WHERE` predicates.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use dp_core::domain::entities::desktop_token::DesktopToken;
use dp_core::errors::DomainError;
use dp_core::repositories::DesktopTokenRepository;

/// Desktop token repository backed by a `HashMap`
#[derive(Clone, Default)]
pub struct InMemoryDesktopTokenRepository {
    tokens: Arc<RwLock<HashMap<String, DesktopToken>>>,
}

impl InMemoryDesktopTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a record regardless of age
    pub async fn get(&self, token: &str) -> Option<DesktopToken> {
        self.tokens.read().await.get(token).cloned()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

#[async_trait]
impl DesktopTokenRepository for InMemoryDesktopTokenRepository {
    async fn insert(&self, token: &DesktopToken) -> Result<(), DomainError> {
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
        let tokens = self.tokens.read().await;
        Ok(tokens
            .get(token)
            .filter(|record| record.is_fresh(min_created_at))
            .cloned())
    }

    async fn set_user_id(
        &self,
        token: &str,
        min_created_at: i64,
        user_id: Uuid,
    ) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;

        match tokens.get_mut(token) {
            Some(record) if record.is_fresh(min_created_at) && !record.is_authenticated() => {
                record.user_id = Some(user_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, token: &str) -> Result<(), DomainError> {
        self.tokens.write().await.remove(token);
        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: Uuid) -> Result<u64, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();

        tokens.retain(|_, record| record.user_id != Some(user_id));

        let removed = (before - tokens.len()) as u64;
        debug!(user_id = %user_id, removed, "Removed desktop tokens for user");
        Ok(removed)
    }

    async fn delete_older_than(&self, min_created_at: i64) -> Result<u64, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();

        tokens.retain(|_, record| record.is_fresh(min_created_at));

        Ok((before - tokens.len()) as u64)
    }
}
