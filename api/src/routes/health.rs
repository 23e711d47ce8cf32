use std::collections::HashMap;

use actix_web::{web, HttpResponse};

use dp_core::repositories::{DesktopTokenRepository, UserRepository};
use dp_shared::types::{HealthResponse, HealthStatus, ServiceHealth};

use crate::app::AppState;

/// Health check endpoint handler
///
/// Reports the token store as a service; the in-memory store is always healthy.
pub async fn health_check<R, U>(state: web::Data<AppState<R, U>>) -> HttpResponse
where
    R: DesktopTokenRepository + 'static,
    U: UserRepository + 'static,
{
    let store = match &state.database {
        Some(pool) => match pool.health_check().await {
            Ok(true) => ServiceHealth::healthy(),
            Ok(false) => ServiceHealth::unhealthy("Unexpected health check result"),
            Err(e) => {
                log::error!("Token store health check failed: {}", e);
                ServiceHealth::unhealthy("Database unreachable")
            }
        },
        None => ServiceHealth::healthy(),
    };

    let mut services = HashMap::new();
    services.insert("token_store".to_string(), store);

    let response = HealthResponse::from_services(services, env!("CARGO_PKG_VERSION"));

    match response.status {
        HealthStatus::Unhealthy => HttpResponse::ServiceUnavailable().json(response),
        _ => HttpResponse::Ok().json(response),
    }
}
