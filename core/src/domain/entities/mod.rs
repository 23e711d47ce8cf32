//! Domain entities representing core business objects.

pub mod desktop_token;
pub mod session;
pub mod user;

// Re-export commonly used types
pub use desktop_token::{
    expiry_cutoff, redact_token, DesktopToken, ANY_AGE, DESKTOP_TOKEN_TTL_SECONDS,
    MAX_TOKEN_LENGTH,
};
pub use session::SessionClaims;
pub use user::User;
