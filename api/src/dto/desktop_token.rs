use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use dp_core::domain::entities::user::User;

/// Body of `POST /api/v1/desktop-tokens`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDesktopTokenRequest {
    #[validate(length(min = 1, max = 64))]
    pub token: String,
}

/// Body of the authenticate and validate endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DesktopTokenRequest {
    #[validate(length(min = 1, max = 64))]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDesktopTokenResponse {
    pub token: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticateDesktopTokenResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateDesktopTokenResponse {
    pub user: UserResponse,
}

/// Public view of a user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let display_name = user.display_name().to_string();
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            nickname: user.nickname,
            display_name,
            created_at: user.created_at,
        }
    }
}
