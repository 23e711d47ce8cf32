//! Desktop token lifecycle errors with bilingual messages (English | Chinese)

use dp_shared::errors::error_codes;
use thiserror::Error;

use super::DomainError;

/// Errors returned by the desktop token lifecycle operations
#[derive(Error, Debug)]
pub enum DesktopTokenError {
    #[error("Desktop token already exists | 桌面令牌已存在")]
    Collision,

    #[error("Desktop token is invalid or expired | 桌面令牌无效或已过期")]
    InvalidOrExpired,

    #[error("Desktop token expired | 桌面令牌已过期")]
    Expired,

    #[error("Desktop token has not been authenticated yet | 桌面令牌尚未通过认证")]
    NotYetAuthenticated,

    #[error("Desktop token user could not be resolved: {reason} | 无法获取桌面令牌对应的用户: {reason}")]
    UserResolutionFailed { reason: String },

    #[error("Desktop token store failed during {operation}: {source} | 桌面令牌存储操作失败: {operation}")]
    StoreFailure {
        operation: &'static str,
        #[source]
        source: Box<DomainError>,
    },
}

pub type DesktopTokenResult<T> = Result<T, DesktopTokenError>;

impl DesktopTokenError {
    /// Wraps a store error with the name of the operation that hit it
    pub fn store_failure(operation: &'static str, source: DomainError) -> Self {
        DesktopTokenError::StoreFailure {
            operation,
            source: Box::new(source),
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            DesktopTokenError::Collision => error_codes::TOKEN_COLLISION,
            DesktopTokenError::InvalidOrExpired => error_codes::TOKEN_INVALID_OR_EXPIRED,
            DesktopTokenError::Expired => error_codes::TOKEN_EXPIRED,
            DesktopTokenError::NotYetAuthenticated => error_codes::TOKEN_NOT_AUTHENTICATED,
            DesktopTokenError::UserResolutionFailed { .. } => error_codes::USER_RESOLUTION_FAILED,
            DesktopTokenError::StoreFailure { .. } => error_codes::STORE_FAILURE,
        }
    }

    /// Whether the failure is on the server side rather than the caller's
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            DesktopTokenError::UserResolutionFailed { .. } | DesktopTokenError::StoreFailure { .. }
        )
    }
}

/// Helper function to extract English message from bilingual error
pub fn extract_english_message(message: &str) -> &str {
    message.split(" | ").next().unwrap_or(message)
}

/// Helper function to extract Chinese message from bilingual error
pub fn extract_chinese_message(message: &str) -> &str {
    message.split(" | ").nth(1).unwrap_or(message)
}
