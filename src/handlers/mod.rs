//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives request data (JSON body, multipart form, query, cookies)
//! 2. Calls into a service for the actual work
//! 3. Returns a JSON body with `ok: true`, or an [`AppError`](crate::error::AppError)
//!    that renders as `{ "ok": false, "error": "<code>" }`

use serde::Serialize;

/// Admin login, logout, session probe and password change
pub mod auth;
/// Analytics counters
pub mod counters;
/// Login audit log
pub mod devices;
pub mod health;
/// Public call-back requests
pub mod lead;
/// Public and admin review endpoints
pub mod reviews;
/// robots.txt and sitemap.xml
pub mod seo;
/// Public and admin site content
pub mod settings;
/// Two-factor enrollment
pub mod two_factor;
/// Image upload, delete and orphan sweep
pub mod uploads;

/// Body of responses that carry nothing but success.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn success() -> Self {
        Self { ok: true }
    }
}
