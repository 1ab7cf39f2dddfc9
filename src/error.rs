//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::storage::StorageError;

/// Application-wide error type.
///
/// Every variant maps to a stable wire code (see [`AppError::code`]) that the
/// admin UI switches on, so the strings must not change.
///
/// # Error Categories
///
/// - **Authentication**: missing session, wrong password or one-time code
/// - **Validation**: malformed input, policy violations, upload constraints
/// - **State machine**: 2FA or admin setup preconditions not met
/// - **Relay**: notification channel unavailable
/// - **Internal**: storage or I/O failures (details are logged, not returned)
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Session cookie missing, forged or expired.
    #[error("unauthorized")]
    Unauthorized,

    /// Request body could not be understood.
    #[error("bad request")]
    BadRequest,

    /// Unknown `action` field.
    #[error("unknown action")]
    BadAction,

    #[error("not found")]
    NotFound,

    /// Password did not match at login or while disabling 2FA.
    #[error("wrong password")]
    BadPassword,

    #[error("wrong old password")]
    BadOldPassword,

    /// One-time code rejected while enrolling or disabling 2FA.
    #[error("wrong one-time code")]
    BadCode,

    /// One-time code rejected at login. Same wire code, but 401.
    #[error("wrong one-time code")]
    LoginBadCode,

    /// Password accepted but a second factor is enrolled and no code was sent.
    #[error("one-time code required")]
    NeedSecondFactor,

    #[error("new password too short")]
    TooShort,

    /// No session secret, or neither a stored hash nor a bootstrap password.
    #[error("admin is not configured")]
    AdminNotConfigured,

    #[error("no pending 2FA secret")]
    NoPending,

    #[error("2FA is not enabled")]
    NotEnabled,

    #[error("review text is empty or too short")]
    EmptyReview,

    #[error("phone number is invalid")]
    InvalidPhone,

    #[error("multipart form could not be read")]
    BadForm,

    #[error("no file in form")]
    NoFile,

    #[error("file is empty or too large")]
    FileTooLarge,

    #[error("unsupported file type")]
    BadType,

    #[error("upload url is invalid")]
    BadUrl,

    #[error("upload could not be deleted")]
    DeleteFailed,

    #[error("invalid Yandex Metrika id")]
    BadYandexId,

    #[error("invalid Google tag id")]
    BadGoogleTagId,

    #[error("custom HTML is too large")]
    CustomHtmlTooLarge,

    #[error("notification relay is not configured")]
    TelegramNotConfigured,

    /// Relay answered with a failure; the string is passed through to the client.
    #[error("notification relay error")]
    TelegramError(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wire code placed in the `error` field of the response body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "unauthorized",
            AppError::BadRequest => "bad_request",
            AppError::BadAction => "bad_action",
            AppError::NotFound => "not_found",
            AppError::BadPassword => "bad_password",
            AppError::BadOldPassword => "bad_old_password",
            AppError::BadCode | AppError::LoginBadCode => "bad_code",
            AppError::NeedSecondFactor => "need_2fa",
            AppError::TooShort => "too_short",
            AppError::AdminNotConfigured => "admin_not_configured",
            AppError::NoPending => "no_pending",
            AppError::NotEnabled => "not_enabled",
            AppError::EmptyReview => "empty_review",
            AppError::InvalidPhone => "invalid_phone",
            AppError::BadForm => "bad_form",
            AppError::NoFile => "no_file",
            AppError::FileTooLarge => "file_too_large",
            AppError::BadType => "bad_type",
            AppError::BadUrl => "bad_url",
            AppError::DeleteFailed => "delete_failed",
            AppError::BadYandexId => "bad_yandex_id",
            AppError::BadGoogleTagId => "bad_google_tag_id",
            AppError::CustomHtmlTooLarge => "custom_html_too_large",
            AppError::TelegramNotConfigured => "tg_not_configured",
            AppError::TelegramError(_) => "tg_error",
            AppError::Storage(_) | AppError::Io(_) | AppError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized
            | AppError::BadPassword
            | AppError::BadOldPassword
            | AppError::LoginBadCode
            | AppError::NeedSecondFactor => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::AdminNotConfigured
            | AppError::TelegramNotConfigured
            | AppError::DeleteFailed
            | AppError::Storage(_)
            | AppError::Io(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::TelegramError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// { "ok": false, "error": "bad_code" }
/// ```
///
/// `tg_error` additionally carries a `details` string. Internal failures are
/// logged here and reported only as `internal_error`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let body = match &self {
            AppError::TelegramError(details) => json!({
                "ok": false,
                "error": code,
                "details": details,
            }),
            AppError::Storage(_) | AppError::Io(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                json!({ "ok": false, "error": code })
            }
            _ => json!({ "ok": false, "error": code }),
        };

        (status, Json(body)).into_response()
    }
}
