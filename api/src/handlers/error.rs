use actix_web::{
    error::JsonPayloadError,
    http::{header, StatusCode},
    HttpRequest, HttpResponse,
};
use validator::ValidationErrors;

use crate::dto::{ErrorResponse, ErrorResponseExt};
use dp_core::errors::{extract_chinese_message, extract_english_message, DesktopTokenError};
use dp_shared::errors::error_codes;
use dp_shared::types::Language;

/// Detect language preference from the Accept-Language header
pub fn language_from_request(req: &HttpRequest) -> Language {
    req.headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(Language::from_accept_language)
        .unwrap_or_default()
}

/// HTTP status for each desktop token failure
pub fn desktop_token_status(error: &DesktopTokenError) -> StatusCode {
    match error {
        DesktopTokenError::Collision => StatusCode::CONFLICT,
        DesktopTokenError::InvalidOrExpired
        | DesktopTokenError::Expired
        | DesktopTokenError::NotYetAuthenticated => StatusCode::UNAUTHORIZED,
        DesktopTokenError::UserResolutionFailed { .. } | DesktopTokenError::StoreFailure { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Convert a desktop token error to a localized HTTP response
///
/// Internal failures are logged in full and answered with a generic message.
pub fn handle_desktop_token_error(error: DesktopTokenError, lang: Language) -> HttpResponse {
    let status = desktop_token_status(&error);

    let message = match &error {
        DesktopTokenError::StoreFailure { .. } => {
            log::error!("Desktop token store failure: {}", error);
            lang.localize(
                "Desktop sign-in is temporarily unavailable. Please try again later",
                "桌面登录暂时不可用，请稍后重试",
            )
            .to_string()
        }
        DesktopTokenError::UserResolutionFailed { .. } => {
            log::error!("Desktop token user resolution failed: {}", error);
            lang.localize(
                "The account linked to this desktop token could not be loaded",
                "无法加载与此桌面令牌关联的账户",
            )
            .to_string()
        }
        _ => {
            log::debug!("Desktop token request rejected: {}", error);
            let full = error.to_string();
            lang.localize(extract_english_message(&full), extract_chinese_message(&full))
                .to_string()
        }
    };

    ErrorResponse::new(error.code(), message).to_response(status)
}

/// 400 response listing the fields that failed validation
pub fn handle_validation_errors(errors: &ValidationErrors, lang: Language) -> HttpResponse {
    let fields: Vec<&str> = errors.field_errors().keys().copied().collect();

    ErrorResponse::new(
        error_codes::VALIDATION_ERROR,
        lang.localize(
            "Invalid request data. Token must be 1 to 64 characters",
            "请求数据无效。令牌长度必须为1到64个字符",
        ),
    )
    .add_detail("fields", fields)
    .to_response(StatusCode::BAD_REQUEST)
}

/// 401 response for a missing, invalid or unknown browser session
pub fn unauthorized_response(lang: Language) -> HttpResponse {
    ErrorResponse::new(
        error_codes::UNAUTHORIZED,
        lang.localize("Authentication required", "需要登录认证"),
    )
    .to_response(StatusCode::UNAUTHORIZED)
}

/// 500 response that hides the underlying cause
pub fn internal_error_response(lang: Language) -> HttpResponse {
    ErrorResponse::new(
        error_codes::INTERNAL_ERROR,
        lang.localize("An internal error occurred", "发生内部错误"),
    )
    .to_response(StatusCode::INTERNAL_SERVER_ERROR)
}

/// 404 response for unknown routes
pub fn not_found_response(lang: Language) -> HttpResponse {
    ErrorResponse::new(
        error_codes::NOT_FOUND,
        lang.localize(
            "The requested resource was not found",
            "请求的资源不存在",
        ),
    )
    .to_response(StatusCode::NOT_FOUND)
}

/// Error handler for malformed JSON bodies
pub fn json_error_handler(error: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let lang = language_from_request(req);
    log::debug!("Rejected request body: {}", error);

    let response = ErrorResponse::new(
        error_codes::VALIDATION_ERROR,
        lang.localize("Malformed request body", "请求体格式错误"),
    )
    .to_response(StatusCode::BAD_REQUEST);

    actix_web::error::InternalError::from_response(error, response).into()
}
