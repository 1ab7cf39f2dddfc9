//! Upload handlers.
//!
//! This module implements:
//! - POST /api/admin/upload - Store an image from a multipart form
//! - DELETE /api/admin/upload?url=/uploads/<name> - Delete one upload
//! - GET /api/admin/uploads/cleanup - Preview files no content references
//! - POST /api/admin/uploads/cleanup - Delete those files

use axum::{
    Json,
    extract::{
        Multipart, Query, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::QueryRejection,
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    handlers::OkResponse,
    models::upload::{OrphanPreview, SweepReport, UploadResponse},
    state::AppState,
};

/// Store an uploaded image.
///
/// # Endpoint
///
/// `POST /api/admin/upload` (multipart/form-data, field `file`)
///
/// # Response
///
/// - **Success (200 OK)**: `{ "ok": true, "url": "/uploads/upload-<ms>-<hex>.jpg" }`
/// - **Error (400)**: `bad_form`, `no_file`, `file_too_large` (empty or over 20 MiB),
///   `bad_type` (only JPEG, PNG and WebP are accepted)
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(|_| AppError::BadForm)?;

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let mime = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(form_error)?;

        let url = state.uploads.save(&bytes, &mime).await?;
        return Ok(Json(UploadResponse { ok: true, url }));
    }

    Err(AppError::NoFile)
}

/// A body over the route's limit surfaces as a multipart read error.
fn form_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge
    } else {
        AppError::BadForm
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteUploadParams {
    pub url: Option<String>,
}

/// Delete one uploaded file.
///
/// # Endpoint
///
/// `DELETE /api/admin/upload?url=/uploads/<name>`
///
/// Deleting a file that is already gone succeeds. The settings document is
/// not touched; remove the reference there separately.
///
/// # Response
///
/// - **Success (200 OK)**: `{ "ok": true }`
/// - **Error (400)**: `bad_url`
/// - **Error (500)**: `delete_failed`
pub async fn delete_file(
    State(state): State<AppState>,
    params: Result<Query<DeleteUploadParams>, QueryRejection>,
) -> Result<Json<OkResponse>, AppError> {
    let url = params
        .ok()
        .and_then(|Query(params)| params.url)
        .ok_or(AppError::BadUrl)?;

    state.uploads.delete(&url).await?;
    Ok(Json(OkResponse::success()))
}

#[derive(Debug, Serialize)]
pub struct CleanupPreviewResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub preview: OrphanPreview,
}

/// List uploads that no content references, without deleting them.
///
/// # Endpoint
///
/// `GET /api/admin/uploads/cleanup`
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "ok": true,
///   "usedCount": 2,
///   "totalFiles": 3,
///   "orphanCount": 1,
///   "orphans": [{ "name": "upload-1.jpg", "url": "/uploads/upload-1.jpg" }]
/// }
/// ```
pub async fn preview_cleanup(
    State(state): State<AppState>,
) -> Result<Json<CleanupPreviewResponse>, AppError> {
    let used = state.settings.used_uploads().await?;
    let preview = state.uploads.preview(&used).await?;
    Ok(Json(CleanupPreviewResponse { ok: true, preview }))
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub report: SweepReport,
}

/// Delete every upload that no content references.
///
/// # Endpoint
///
/// `POST /api/admin/uploads/cleanup`
///
/// Files that could not be removed are listed in `failed`; the rest of the
/// sweep still runs. Running it twice in a row deletes nothing the second time.
pub async fn run_cleanup(State(state): State<AppState>) -> Result<Json<CleanupResponse>, AppError> {
    let used = state.settings.used_uploads().await?;
    let report = state.uploads.sweep(&used).await?;
    Ok(Json(CleanupResponse { ok: true, report }))
}
