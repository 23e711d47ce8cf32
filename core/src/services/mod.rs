//! Business services containing domain logic and use cases.

pub mod desktop_token;

// Re-export commonly used types
pub use desktop_token::{
    CleanupJob, CleanupResult, Clock, DesktopTokenCleanupService, DesktopTokenService,
    FixedClock, ManualTaskRunner, SystemClock, TaskRunner, TokenCleanupConfig, TokioTaskRunner,
};
