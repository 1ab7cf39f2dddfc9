//! Signed admin session tokens.
//!
//! Token format: `v1.<expiryMillis>.<hex HMAC-SHA256 of "v1.<expiryMillis>">`.
//! Nothing is stored server side; a token is valid iff its signature matches
//! under the configured secret and the expiry has not passed.

use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use time::{Duration, OffsetDateTime};

type HmacSha256 = Hmac<Sha256>;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "admin_session";

pub const TOKEN_VERSION: &str = "v1";

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Mint a token that expires `ttl_millis` from now.
pub fn mint(secret: &str, ttl_millis: i64) -> String {
    mint_until(secret, now_millis().saturating_add(ttl_millis))
}

/// Mint a token with an absolute expiry.
pub fn mint_until(secret: &str, expires_at_millis: i64) -> String {
    let payload = format!("{TOKEN_VERSION}.{expires_at_millis}");
    let signature = sign(&payload, secret);
    format!("{payload}.{signature}")
}

/// Check a token against the current time.
pub fn verify(token: &str, secret: Option<&str>) -> bool {
    verify_at(token, secret, now_millis())
}

/// Check a token as of `now_millis`.
///
/// Fails closed: a missing secret, wrong part count, unknown version, bad
/// signature length or non-numeric expiry are all simply `false`.
pub fn verify_at(token: &str, secret: Option<&str>, now_millis: i64) -> bool {
    let Some(secret) = secret.filter(|s| !s.is_empty()) else {
        return false;
    };

    let parts: Vec<&str> = token.split('.').collect();
    let [version, expiry, signature] = parts.as_slice() else {
        return false;
    };
    if *version != TOKEN_VERSION {
        return false;
    }

    let expected = sign(&format!("{version}.{expiry}"), secret);
    if signature.len() != expected.len() {
        return false;
    }
    if !bool::from(signature.as_bytes().ct_eq(expected.as_bytes())) {
        return false;
    }

    match expiry.parse::<i64>() {
        Ok(expires_at) => now_millis <= expires_at,
        Err(_) => false,
    }
}

fn sign(payload: &str, secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC key length is valid");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Session cookie carrying `token` for `max_age_secs`.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

/// Cookie that overwrites the session with an expired empty value.
pub fn cleared_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// The session token from the request cookies, if present and non-empty.
pub fn token_from_jar(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|token| !token.is_empty())
}
