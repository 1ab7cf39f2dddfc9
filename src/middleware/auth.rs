//! Admin session middleware.
//!
//! This middleware intercepts every admin request to:
//! 1. Read the `admin_session` cookie
//! 2. Verify its signature and expiry against `ADMIN_SESSION_SECRET`
//! 3. Reject the request with HTTP 401 when either check fails
//!
//! Without a configured secret every request is rejected.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{error::AppError, services::session, state::AppState};

/// Session gate for admin routes.
///
/// # Flow
///
/// 1. Read the token from the request cookies
/// 2. Verify it against the configured secret (fails closed when absent)
/// 3. If valid: call next handler
/// 4. Otherwise: return 401 `unauthorized`
pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session::token_from_jar(&jar).ok_or(AppError::Unauthorized)?;

    if !session::verify(token, state.config.session_secret()) {
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Whether the request carries a valid session, for routes that answer
/// either way (`/api/admin/me`).
pub fn is_admin(state: &AppState, jar: &CookieJar) -> bool {
    session::token_from_jar(jar)
        .is_some_and(|token| session::verify(token, state.config.session_secret()))
}
