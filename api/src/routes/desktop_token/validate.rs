use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use dp_core::repositories::{DesktopTokenRepository, UserRepository};

use crate::app::AppState;
use crate::dto::{DesktopTokenRequest, UserResponse, ValidateDesktopTokenResponse};
use crate::handlers::error::{
    handle_desktop_token_error, handle_validation_errors, language_from_request,
};

/// Handler for POST /api/v1/desktop-tokens/validate
///
/// Polled by the desktop client until the token resolves to a user.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "user": { "id": "...", "username": "alice", "email": "alice@example.com", ... } }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: `desktop_token_not_authenticated` while pending,
///   `desktop_token_expired` once the token is gone or too old
/// - 500 Internal Server Error: bound user cannot be loaded, or store failure
pub async fn validate_desktop_token<R, U>(
    req: HttpRequest,
    state: web::Data<AppState<R, U>>,
    request: web::Json<DesktopTokenRequest>,
) -> HttpResponse
where
    R: DesktopTokenRepository + 'static,
    U: UserRepository + 'static,
{
    let lang = language_from_request(&req);

    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, lang);
    }

    match state
        .desktop_token_service
        .validate_token(&request.token, state.expiry_window())
        .await
    {
        Ok(user) => HttpResponse::Ok().json(ValidateDesktopTokenResponse {
            user: UserResponse::from(user),
        }),
        Err(error) => handle_desktop_token_error(error, lang),
    }
}
