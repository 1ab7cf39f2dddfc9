//! Site content handlers.
//!
//! - GET /api/settings - Public read
//! - GET /api/admin/settings - Admin read (same document)
//! - POST /api/admin/settings - Admin partial update

use axum::{Json, extract::State};
use serde::Serialize;

use crate::{
    error::AppError,
    extract::LenientJson,
    models::settings::{SettingsPatch, SiteSettings},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub ok: bool,
    pub settings: SiteSettings,
}

/// Read the site content.
///
/// # Endpoint
///
/// `GET /api/settings` and `GET /api/admin/settings`
///
/// A missing or corrupt document is replaced by the defaults before
/// answering, so this only fails on storage errors.
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<SettingsResponse>, AppError> {
    let settings = state.settings.read().await?;
    Ok(Json(SettingsResponse { ok: true, settings }))
}

/// Update the site content.
///
/// # Endpoint
///
/// `POST /api/admin/settings`
///
/// # Request Body
///
/// Any subset of the settings fields:
///
/// ```json
/// {
///   "phone": "+7 900 000-00-00",
///   "benefits": ["Same-day visit", "Warranty"],
///   "aboutPhotos": ["/uploads/upload-1700000000000-a1b2c3d4e5f6.jpg"]
/// }
/// ```
///
/// Fields that are absent or of the wrong type are left unchanged. Strings
/// are trimmed; lists drop blank entries and are capped.
///
/// # Response (200 OK)
///
/// The full document after the update, as in `GET`.
pub async fn update_settings(
    State(state): State<AppState>,
    LenientJson(body): LenientJson,
) -> Result<Json<SettingsResponse>, AppError> {
    let patch = SettingsPatch::from_value(&body);
    let settings = state.settings.write(patch).await?;
    Ok(Json(SettingsResponse { ok: true, settings }))
}
