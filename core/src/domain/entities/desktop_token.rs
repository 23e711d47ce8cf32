//! Desktop pairing token entity.
//!
//! A desktop token links an unauthenticated desktop client to the user who
//! approves it from an authenticated browser session. The token string is
//! generated by the desktop client; the server only records when it was
//! issued and which user, if any, has claimed it.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default lifetime of a desktop token (3 minutes)
pub const DESKTOP_TOKEN_TTL_SECONDS: i64 = 180;

/// Longest token string accepted by the store
pub const MAX_TOKEN_LENGTH: usize = 64;

/// Freshness cutoff that matches a record of any age
pub const ANY_AGE: i64 = 0;

/// Number of leading characters kept when a token appears in logs
const LOG_PREFIX_CHARS: usize = 6;

/// A pending or claimed desktop pairing token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopToken {
    /// Opaque token string supplied by the desktop client
    pub token: String,

    /// Issuance time in epoch seconds
    pub created_at: i64,

    /// User who claimed the token; `None` until a browser session binds it
    pub user_id: Option<Uuid>,
}

impl DesktopToken {
    /// Creates a new unbound token record
    pub fn new(token: impl Into<String>, created_at: i64) -> Self {
        Self {
            token: token.into(),
            created_at,
            user_id: None,
        }
    }

    /// Whether a browser session has claimed this token
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Whether the record was created at or after `min_created_at`
    pub fn is_fresh(&self, min_created_at: i64) -> bool {
        self.created_at >= min_created_at
    }

    /// Whether the record has outlived `expiry_window` at time `now`
    pub fn is_expired(&self, now: i64, expiry_window: Duration) -> bool {
        !self.is_fresh(expiry_cutoff(now, expiry_window))
    }
}

/// Oldest creation time that is still fresh at `now` for the given window
pub fn expiry_cutoff(now: i64, expiry_window: Duration) -> i64 {
    now.saturating_sub(expiry_window.num_seconds())
}

/// Shortens a token for log output
pub fn redact_token(token: &str) -> &str {
    match token.char_indices().nth(LOG_PREFIX_CHARS) {
        Some((index, _)) => &token[..index],
        None => token,
    }
}
