use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use dp_core::domain::entities::desktop_token::redact_token;
use dp_core::repositories::{DesktopTokenRepository, UserRepository};

use crate::app::AppState;
use crate::dto::{AuthenticateDesktopTokenResponse, DesktopTokenRequest};
use crate::handlers::error::{
    handle_desktop_token_error, handle_validation_errors, internal_error_response,
    language_from_request, unauthorized_response,
};
use crate::middleware::auth::AuthContext;

/// Handler for POST /api/v1/desktop-tokens/authenticate
///
/// Binds the desktop token to the user of the calling browser session.
/// Requires `Authorization: Bearer <session jwt>`.
///
/// # Request Body
///
/// ```json
/// { "token": "b1f0c2d4e5" }
/// ```
///
/// ## Errors
/// - 400 Bad Request: malformed token
/// - 401 Unauthorized: no valid session, unknown session user, or the token
///   is missing, expired or already claimed
/// - 500 Internal Server Error: token store or user lookup failure
pub async fn authenticate_desktop_token<R, U>(
    req: HttpRequest,
    auth: AuthContext,
    state: web::Data<AppState<R, U>>,
    request: web::Json<DesktopTokenRequest>,
) -> HttpResponse
where
    R: DesktopTokenRepository + 'static,
    U: UserRepository + 'static,
{
    let lang = language_from_request(&req);

    if let Err(errors) = request.validate() {
        log::warn!("Validation failed for authenticate_desktop_token: {:?}", errors);
        return handle_validation_errors(&errors, lang);
    }

    let user = match state.user_repository.find_by_id(auth.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            log::warn!("Session user {} no longer exists", auth.user_id);
            return unauthorized_response(lang);
        }
        Err(e) => {
            log::error!("Failed to load session user {}: {}", auth.user_id, e);
            return internal_error_response(lang);
        }
    };

    let token = request.into_inner().token;

    match state
        .desktop_token_service
        .authenticate_token(&token, state.expiry_window(), &user)
        .await
    {
        Ok(()) => {
            log::info!(
                "Desktop token {} approved by user {}",
                redact_token(&token),
                user.id
            );
            HttpResponse::Ok().json(AuthenticateDesktopTokenResponse {
                message: lang
                    .localize("Desktop sign-in approved", "桌面端登录已确认")
                    .to_string(),
            })
        }
        Err(error) => handle_desktop_token_error(error, lang),
    }
}
