//! Site Server - backend for a small local-business website
//!
//! Serves the public site's data (content, reviews, call-back requests) and
//! the admin panel API behind a signed session cookie with optional TOTP.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Storage**: whole JSON documents in a data directory, written atomically
//! - **Authentication**: bcrypt password, HMAC-SHA256 signed session cookie, RFC 6238 TOTP
//! - **Notifications**: Telegram Bot API
//! - **Format**: JSON requests/responses, `{ "ok": false, "error": "<code>" }` on failure

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::models::upload::MAX_UPLOAD_BYTES;
use crate::state::AppState;

/// Multipart framing on top of the largest accepted file.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

/// Build the full HTTP router.
///
/// # Routes
///
/// - Public: health, settings, reviews, lead, robots/sitemap, `/uploads/*` files
/// - Admin session endpoints: login, logout, me
/// - Admin (session cookie required): everything else under `/api/admin`
pub fn build_router(state: AppState) -> Router {
    // Admin routes behind the session gate
    let admin_routes = Router::new()
        .route("/api/admin/password", post(handlers::auth::change_password))
        .route(
            "/api/admin/2fa",
            get(handlers::two_factor::get_status).post(handlers::two_factor::post_action),
        )
        .route(
            "/api/admin/settings",
            get(handlers::settings::get_settings).post(handlers::settings::update_settings),
        )
        .route(
            "/api/admin/reviews",
            get(handlers::reviews::list_admin_reviews).post(handlers::reviews::moderate_review),
        )
        .route(
            "/api/admin/upload",
            post(handlers::uploads::upload_file)
                .delete(handlers::uploads::delete_file)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/api/admin/uploads/cleanup",
            get(handlers::uploads::preview_cleanup).post(handlers::uploads::run_cleanup),
        )
        .route("/api/admin/devices", get(handlers::devices::list_devices))
        .route(
            "/api/admin/counters",
            get(handlers::counters::get_counters).post(handlers::counters::update_counters),
        )
        // Apply the session check to every route in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_admin,
        ));

    let uploads_dir = state.uploads.path().to_path_buf();

    Router::new()
        // Public routes
        .route("/health", get(handlers::health::health_check))
        .route("/api/settings", get(handlers::settings::get_settings))
        .route("/api/reviews", get(handlers::reviews::list_public_reviews))
        .route("/api/review", post(handlers::reviews::submit_review))
        .route("/api/lead", post(handlers::lead::submit_lead))
        .route("/robots.txt", get(handlers::seo::robots))
        .route("/sitemap.xml", get(handlers::seo::sitemap))
        // Session endpoints, usable without a session
        .route("/api/admin/login", post(handlers::auth::login))
        .route("/api/admin/logout", post(handlers::auth::logout))
        .route("/api/admin/me", get(handlers::auth::me))
        .merge(admin_routes)
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
