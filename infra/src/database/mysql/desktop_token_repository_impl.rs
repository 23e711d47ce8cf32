//! MySQL implementation of the DesktopTokenRepository trait.
//!
//! Freshness and ownership predicates are evaluated inside the `WHERE`
//! clause, so every conditional read or bind is a single statement.

use async_trait::async_trait;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use dp_core::domain::entities::desktop_token::DesktopToken;
use dp_core::errors::DomainError;
use dp_core::repositories::DesktopTokenRepository;

/// MySQL implementation of DesktopTokenRepository
pub struct MySqlDesktopTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlDesktopTokenRepository {
    /// Create a new MySQL desktop token repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to DesktopToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<DesktopToken, DomainError> {
        let user_id: Option<String> = row.try_get("user_id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get user_id: {}", e),
        })?;

        let user_id = user_id
            .map(|id| Uuid::parse_str(&id))
            .transpose()
            .map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?;

        Ok(DesktopToken {
            token: row.try_get("token").map_err(|e| DomainError::Internal {
                message: format!("Failed to get token: {}", e),
            })?,
            created_at: row.try_get("create_at").map_err(|e| DomainError::Internal {
                message: format!("Failed to get create_at: {}", e),
            })?,
            user_id,
        })
    }
}

#[async_trait]
impl DesktopTokenRepository for MySqlDesktopTokenRepository {
    async fn insert(&self, token: &DesktopToken) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO desktop_tokens (token, create_at, user_id)
            VALUES (?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(&token.token)
            .bind(token.created_at)
            .bind(token.user_id.map(|id| id.to_string()))
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    DomainError::AlreadyExists {
                        resource: "desktop_token".to_string(),
                    }
                }
                e => DomainError::Internal {
                    message: format!("Failed to insert desktop token: {}", e),
                },
            })?;

        Ok(())
    }

    async fn find_by_token(
        &self,
        token: &str,
        min_created_at: i64,
    ) -> Result<Option<DesktopToken>, DomainError> {
        let query = r#"
            SELECT token, create_at, user_id
            FROM desktop_tokens
            WHERE token = ? AND create_at >= ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(token)
            .bind(min_created_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find desktop token: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_token(&row)?)),
            None => Ok(None),
        }
    }

    async fn set_user_id(
        &self,
        token: &str,
        min_created_at: i64,
        user_id: Uuid,
    ) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE desktop_tokens
            SET user_id = ?
            WHERE token = ? AND create_at >= ? AND user_id IS NULL
        "#;

        let result = sqlx::query(query)
            .bind(user_id.to_string())
            .bind(token)
            .bind(min_created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to bind desktop token: {}", e),
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, token: &str) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM desktop_tokens WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete desktop token: {}", e),
            })?;

        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: Uuid) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM desktop_tokens WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete desktop tokens for user: {}", e),
            })?;

        Ok(result.rows_affected())
    }

    async fn delete_older_than(&self, min_created_at: i64) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM desktop_tokens WHERE create_at < ?")
            .bind(min_created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to delete expired desktop tokens: {}", e),
            })?;

        Ok(result.rows_affected())
    }
}
