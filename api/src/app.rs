//! Application state and factory
//!
//! This module holds the shared application state and provides the factory
//! for creating the Actix-web application.

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpRequest, HttpResponse};

use dp_core::repositories::{DesktopTokenRepository, UserRepository};
use dp_core::services::DesktopTokenService;
use dp_infra::database::DatabasePool;
use dp_shared::config::{CorsConfig, DesktopTokenConfig, JwtConfig};

use crate::handlers::error::{json_error_handler, language_from_request, not_found_response};
use crate::middleware::{auth::JwtAuth, cors::create_cors};
use crate::routes::{desktop_token, health};

/// Application state that holds shared services
pub struct AppState<R, U>
where
    R: DesktopTokenRepository,
    U: UserRepository,
{
    pub desktop_token_service: Arc<DesktopTokenService<R, U>>,
    /// Resolves the browser session user before binding
    pub user_repository: Arc<U>,
    pub desktop_token_config: DesktopTokenConfig,
    /// Present when tokens are stored in MySQL
    pub database: Option<DatabasePool>,
}

impl<R, U> AppState<R, U>
where
    R: DesktopTokenRepository + 'static,
    U: UserRepository + 'static,
{
    pub fn new(
        desktop_token_service: Arc<DesktopTokenService<R, U>>,
        user_repository: Arc<U>,
        desktop_token_config: DesktopTokenConfig,
    ) -> Self {
        Self {
            desktop_token_service,
            user_repository,
            desktop_token_config,
            database: None,
        }
    }

    pub fn with_database(mut self, database: Option<DatabasePool>) -> Self {
        self.database = database;
        self
    }

    /// Expiry window applied to bind and validate
    pub fn expiry_window(&self) -> chrono::Duration {
        self.desktop_token_config.ttl()
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<R, U>(
    app_state: web::Data<AppState<R, U>>,
    jwt_config: JwtConfig,
    cors_config: &CorsConfig,
    max_payload_size: usize,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    R: DesktopTokenRepository + 'static,
    U: UserRepository + 'static,
{
    let json_config = web::JsonConfig::default()
        .limit(max_payload_size)
        .error_handler(json_error_handler);

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        .wrap(create_cors(cors_config))
        .wrap(Logger::default())
        .route("/health", web::get().to(health::health_check::<R, U>))
        .service(
            web::scope("/api/v1").service(
                web::scope("/desktop-tokens")
                    .route(
                        "",
                        web::post().to(desktop_token::create::create_desktop_token::<R, U>),
                    )
                    .service(
                        web::resource("/authenticate")
                            .wrap(JwtAuth::new(jwt_config))
                            .route(web::post().to(
                                desktop_token::authenticate::authenticate_desktop_token::<R, U>,
                            )),
                    )
                    .route(
                        "/validate",
                        web::post().to(desktop_token::validate::validate_desktop_token::<R, U>),
                    ),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found(req: HttpRequest) -> HttpResponse {
    not_found_response(language_from_request(&req))
}
