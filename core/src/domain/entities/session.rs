//! Claims carried by the browser session that approves a desktop token.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload of an authenticated browser session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl SessionClaims {
    /// Creates claims for `user_id` valid for `ttl_seconds` from `now`
    pub fn new(user_id: Uuid, now: i64, ttl_seconds: i64) -> Self {
        Self {
            sub: user_id.to_string(),
            iat: now,
            exp: now + ttl_seconds,
            iss: None,
        }
    }

    /// Parses the subject as a user ID
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}
