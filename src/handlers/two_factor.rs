//! Two-factor authentication handlers.
//!
//! - GET /api/admin/2fa - Current state; starts enrollment when not enabled
//! - POST /api/admin/2fa - `verify` a pending secret or `disable` 2FA

use axum::{Json, extract::State};
use serde::Serialize;

use crate::{
    error::AppError,
    extract::{LenientJson, code_field, text_field},
    services::two_factor::{self, TwoFactorStatus},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct TwoFactorResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub status: TwoFactorStatus,
}

/// Report 2FA state.
///
/// # Endpoint
///
/// `GET /api/admin/2fa`
///
/// # Response (200 OK)
///
/// When enabled:
///
/// ```json
/// { "ok": true, "enabled": true }
/// ```
///
/// Otherwise a fresh pending secret is stored and returned, replacing any
/// previous pending one:
///
/// ```json
/// {
///   "ok": true,
///   "enabled": false,
///   "secret": "JBSWY3DPEHPK3PXP...",
///   "otpauth": "otpauth://totp/Site%20%28example.org%29?secret=...&issuer=Site",
///   "qrDataUrl": "data:image/svg+xml;base64,..."
/// }
/// ```
pub async fn get_status(State(state): State<AppState>) -> Result<Json<TwoFactorResponse>, AppError> {
    let status = two_factor::status_or_enroll(
        &state.credentials,
        &state.config.site_name,
        &state.config.site_domain,
    )
    .await?;

    Ok(Json(TwoFactorResponse { ok: true, status }))
}

#[derive(Debug, Serialize)]
pub struct TwoFactorChangeResponse {
    pub ok: bool,
    pub enabled: bool,
}

/// Confirm enrollment or turn 2FA off.
///
/// # Endpoint
///
/// `POST /api/admin/2fa`
///
/// # Request Body
///
/// ```json
/// { "action": "verify", "code": "123456" }
/// { "action": "disable", "code": "123456", "password": "secret" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ "ok": true, "enabled": <new state> }`
/// - **Error (400)**: `no_pending`, `not_enabled`, `bad_code`, `bad_action`
/// - **Error (401)**: `bad_password`
pub async fn post_action(
    State(state): State<AppState>,
    LenientJson(body): LenientJson,
) -> Result<Json<TwoFactorChangeResponse>, AppError> {
    let code = code_field(&body, "code");

    let enabled = match text_field(&body, "action").as_str() {
        "verify" => {
            two_factor::confirm(&state.credentials, &code).await?;
            true
        }
        "disable" => {
            let password = text_field(&body, "password");
            two_factor::disable(&state.credentials, &password, &code).await?;
            false
        }
        _ => return Err(AppError::BadAction),
    };

    Ok(Json(TwoFactorChangeResponse { ok: true, enabled }))
}
