//! Admin authentication HTTP handlers.
//!
//! This module implements:
//! - POST /api/admin/login - Password (+ one-time code) login, sets the session cookie
//! - POST /api/admin/logout - Expires the session cookie
//! - GET /api/admin/me - Reports whether the caller has a valid session
//! - POST /api/admin/password - Changes the admin password (session required)

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use crate::{
    error::AppError,
    extract::{LenientJson, code_field, text_field},
    handlers::OkResponse,
    middleware::auth::is_admin,
    services::{notify_service, session, two_factor},
    state::AppState,
};

/// Log in as admin.
///
/// # Endpoint
///
/// `POST /api/admin/login`
///
/// # Request Body
///
/// ```json
/// { "password": "secret", "code": "123 456" }
/// ```
///
/// `code` is only needed once 2FA is enabled; whitespace in it is ignored.
///
/// # Flow
///
/// 1. Require a session secret and some way to verify a password
/// 2. Verify the password (stored hash, else bootstrap password)
/// 3. If 2FA is enabled, verify the one-time code
/// 4. Mint a session token and set it as an HttpOnly cookie
/// 5. Record the device and send a login notification in the background
///
/// # Response
///
/// - **Success (200 OK)**: `{ "ok": true }` plus `Set-Cookie`
/// - **Error (401)**: `bad_password`, `need_2fa`, `bad_code`
/// - **Error (500)**: `admin_not_configured`
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    LenientJson(body): LenientJson,
) -> Result<(CookieJar, Json<OkResponse>), AppError> {
    let secret = state
        .config
        .session_secret()
        .ok_or(AppError::AdminNotConfigured)?;
    if !state.credentials.is_configured().await? {
        return Err(AppError::AdminNotConfigured);
    }

    let password = text_field(&body, "password");
    if !state.credentials.verify_password(&password).await? {
        tracing::warn!("admin login rejected: wrong password");
        return Err(AppError::BadPassword);
    }

    let record = state.credentials.read().await?;
    two_factor::check_login_code(&record, &code_field(&body, "code"))?;

    let ttl_millis = state.config.session_ttl_millis();
    let token = session::mint(secret, ttl_millis);
    let cookie = session::session_cookie(&token, ttl_millis / 1000, state.config.cookie_secure);

    let (ip, user_agent) = client_info(&headers);
    if let Err(e) = state
        .devices
        .record_login(&ip, &user_agent, session::now_millis())
        .await
    {
        tracing::warn!(error = %e, "could not record login device");
    }
    state
        .notifier
        .notify(notify_service::login_message(&ip, &user_agent), false);

    tracing::info!(%ip, "admin logged in");
    Ok((jar.add(cookie), Json(OkResponse::success())))
}

/// Log out by expiring the session cookie.
///
/// # Endpoint
///
/// `POST /api/admin/logout`
///
/// Tokens are not tracked server side, so this only instructs the browser
/// to drop the cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<OkResponse>) {
    let cookie = session::cleared_cookie(state.config.cookie_secure);
    (jar.add(cookie), Json(OkResponse::success()))
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// Whether the caller holds a valid session
    pub ok: bool,
}

/// Session probe used by the admin UI.
///
/// # Endpoint
///
/// `GET /api/admin/me`
///
/// Always 200; `ok` is `false` for anonymous callers.
pub async fn me(State(state): State<AppState>, jar: CookieJar) -> Json<MeResponse> {
    Json(MeResponse {
        ok: is_admin(&state, &jar),
    })
}

/// Change the admin password.
///
/// # Endpoint
///
/// `POST /api/admin/password`
///
/// # Request Body
///
/// ```json
/// { "oldPassword": "current", "newPassword": "at-least-6" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ "ok": true }`; the session cookie is cleared,
///   so the admin must log in again with the new password
/// - **Error (400)**: `too_short`
/// - **Error (401)**: `bad_old_password`
pub async fn change_password(
    State(state): State<AppState>,
    jar: CookieJar,
    LenientJson(body): LenientJson,
) -> Result<(CookieJar, Json<OkResponse>), AppError> {
    let old_password = text_field(&body, "oldPassword");
    let new_password = text_field(&body, "newPassword");

    state
        .credentials
        .change_password(&old_password, &new_password)
        .await?;

    let cookie = session::cleared_cookie(state.config.cookie_secure);
    Ok((jar.add(cookie), Json(OkResponse::success())))
}

/// Client IP and user agent as seen through a reverse proxy.
///
/// IP: first `x-forwarded-for` entry, else `x-real-ip`, else `"unknown"`.
pub fn client_info(headers: &HeaderMap) -> (String, String) {
    let header_text = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let ip = header_text("x-forwarded-for")
        .and_then(|list| list.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .or_else(|| header_text("x-real-ip"))
        .unwrap_or("unknown")
        .to_string();
    let user_agent = header_text(header::USER_AGENT.as_str())
        .unwrap_or("unknown")
        .to_string();

    (ip, user_agent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn client_info_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(" 203.0.113.7 , 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.9"));
        headers.insert(header::USER_AGENT, HeaderValue::from_static("curl/8"));

        assert_eq!(
            client_info(&headers),
            ("203.0.113.7".to_string(), "curl/8".to_string())
        );
    }

    #[test]
    fn client_info_falls_back() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.9"));
        assert_eq!(client_info(&headers).0, "10.0.0.9");

        assert_eq!(
            client_info(&HeaderMap::new()),
            ("unknown".to_string(), "unknown".to_string())
        );
    }
}
