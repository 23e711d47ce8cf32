use std::sync::Arc;

use actix_web::{web, HttpServer};
use log::{info, warn};

use dp_api::app::{create_app, AppState};
use dp_api::config::load_config;
use dp_core::domain::entities::user::User;
use dp_core::repositories::{DesktopTokenRepository, UserRepository};
use dp_core::services::{
    DesktopTokenCleanupService, DesktopTokenService, TokenCleanupConfig, TokioTaskRunner,
};
use dp_infra::database::{DatabasePool, MySqlDesktopTokenRepository, MySqlUserRepository};
use dp_infra::memory::{InMemoryDesktopTokenRepository, InMemoryUserRepository};
use dp_shared::config::{AppConfig, StorageBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let (config, warnings) = load_config();

    env_logger::init_from_env(
        env_logger::Env::new().default_filter_or(config.environment.default_log_level()),
    );

    info!("Starting DeskPair API Server ({})", config.environment);
    for warning in &warnings {
        warn!("{}", warning);
    }

    match config.storage {
        StorageBackend::Mysql => {
            let pool = DatabasePool::new(config.database.clone()).await?;
            pool.run_migrations().await?;

            let tokens = Arc::new(MySqlDesktopTokenRepository::new(pool.get_pool().clone()));
            let users = Arc::new(MySqlUserRepository::new(pool.get_pool().clone()));

            serve(config, tokens, users, Some(pool)).await
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; tokens and users are lost on restart");

            let tokens = Arc::new(InMemoryDesktopTokenRepository::new());
            let users = Arc::new(InMemoryUserRepository::new());

            if config.environment.is_development() {
                let demo = User::new("demo", "demo@deskpair.local");
                info!("Seeded development user {} ({})", demo.username, demo.id);
                users.upsert(demo).await;
            }

            serve(config, tokens, users, None).await
        }
    }
}

async fn serve<R, U>(
    config: AppConfig,
    tokens: Arc<R>,
    users: Arc<U>,
    database: Option<DatabasePool>,
) -> anyhow::Result<()>
where
    R: DesktopTokenRepository + 'static,
    U: UserRepository + 'static,
{
    let runner = Arc::new(TokioTaskRunner::new(
        config.desktop_token.max_concurrent_cleanups,
    ));
    let service = Arc::new(DesktopTokenService::new(tokens.clone(), users.clone(), runner));

    let cleanup = Arc::new(DesktopTokenCleanupService::new(
        tokens,
        TokenCleanupConfig::from(&config.desktop_token),
    ));
    cleanup.start_background_task();

    let state = web::Data::new(
        AppState::new(service, users, config.desktop_token.clone())
            .with_database(database.clone()),
    );

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);
    info!(
        "Desktop tokens expire after {} seconds",
        config.desktop_token.ttl().num_seconds()
    );

    let jwt_config = config.jwt.clone();
    let cors_config = config.cors.clone();
    let max_payload_size = config.server.max_payload_size;

    let mut server = HttpServer::new(move || {
        create_app(
            state.clone(),
            jwt_config.clone(),
            &cors_config,
            max_payload_size,
        )
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    if let Some(pool) = database {
        pool.close().await;
    }

    info!("DeskPair API Server stopped");
    Ok(())
}
