//! Configuration loading for the API server

use dp_shared::config::desktop_token::MAX_TTL_SECONDS;
use dp_shared::config::AppConfig;

/// Load `.env` (if present) and build the application configuration
///
/// Logging is not initialised yet when this runs, so warnings about the
/// configuration are returned for the caller to emit.
pub fn load_config() -> (AppConfig, Vec<String>) {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    let warnings = config_warnings(&config);

    (config, warnings)
}

/// Settings that are legal but unsafe for the configured environment
pub fn config_warnings(config: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.jwt.is_using_default_secret() {
        warnings.push("JWT_SECRET is not set; using the built-in development secret".to_string());
    }
    if config.desktop_token.ttl_seconds <= 0 {
        warnings.push(format!(
            "DESKTOP_TOKEN_TTL_SECONDS is {}; every desktop token will be treated as expired",
            config.desktop_token.ttl_seconds
        ));
    }
    if config.desktop_token.is_ttl_capped() {
        warnings.push(format!(
            "DESKTOP_TOKEN_TTL_SECONDS is {}; capped to {} seconds",
            config.desktop_token.ttl_seconds, MAX_TTL_SECONDS
        ));
    }
    if config.environment.is_production() && config.cors.allows_any_origin() {
        warnings.push("CORS allows any origin in production".to_string());
    }

    warnings
}
