use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use dp_core::domain::entities::desktop_token::redact_token;
use dp_core::repositories::{DesktopTokenRepository, UserRepository};

use crate::app::AppState;
use crate::dto::{CreateDesktopTokenRequest, CreateDesktopTokenResponse};
use crate::handlers::error::{
    handle_desktop_token_error, handle_validation_errors, language_from_request,
};

/// Handler for POST /api/v1/desktop-tokens
///
/// Registers a token generated by a desktop client.
///
/// # Request Body
///
/// ```json
/// { "token": "b1f0c2d4e5" }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// { "token": "b1f0c2d4e5", "created_at": 1723629600 }
/// ```
///
/// ## Errors
/// - 400 Bad Request: token missing or longer than 64 characters
/// - 409 Conflict: token already registered
/// - 500 Internal Server Error: token store failure
pub async fn create_desktop_token<R, U>(
    req: HttpRequest,
    state: web::Data<AppState<R, U>>,
    request: web::Json<CreateDesktopTokenRequest>,
) -> HttpResponse
where
    R: DesktopTokenRepository + 'static,
    U: UserRepository + 'static,
{
    let lang = language_from_request(&req);

    if let Err(errors) = request.validate() {
        log::warn!("Validation failed for create_desktop_token: {:?}", errors);
        return handle_validation_errors(&errors, lang);
    }

    let token = request.into_inner().token;
    log::info!("Registering desktop token {}", redact_token(&token));

    match state.desktop_token_service.issue_token(&token).await {
        Ok(record) => HttpResponse::Created().json(CreateDesktopTokenResponse {
            token: record.token,
            created_at: record.created_at,
        }),
        Err(error) => handle_desktop_token_error(error, lang),
    }
}
