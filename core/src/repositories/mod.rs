pub mod desktop_token;
pub mod user;

pub use desktop_token::DesktopTokenRepository;
pub use user::UserRepository;

#[cfg(test)]
pub use desktop_token::MockDesktopTokenRepository;
#[cfg(test)]
pub use user::MockUserRepository;
