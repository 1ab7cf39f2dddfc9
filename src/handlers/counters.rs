//! Analytics counter handlers.
//!
//! - GET /api/admin/counters
//! - POST /api/admin/counters

use axum::{Json, extract::State};
use serde::Serialize;

use crate::{
    error::AppError,
    extract::LenientJson,
    handlers::OkResponse,
    models::counters::Counters,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct CountersResponse {
    pub ok: bool,
    pub data: Counters,
}

/// Current counter ids and custom HTML; empty strings when never set.
///
/// # Endpoint
///
/// `GET /api/admin/counters`
pub async fn get_counters(State(state): State<AppState>) -> Json<CountersResponse> {
    Json(CountersResponse {
        ok: true,
        data: state.counters.read().await,
    })
}

/// Replace the counters.
///
/// # Endpoint
///
/// `POST /api/admin/counters`
///
/// # Request Body
///
/// ```json
/// { "yandexMetrikaId": "12345678", "googleTagId": "G-ABC123", "customHtml": "" }
/// ```
///
/// Missing fields are stored as empty, which turns that counter off.
///
/// # Response
///
/// - **Success (200 OK)**: `{ "ok": true }`
/// - **Error (400)**: `bad_yandex_id`, `bad_google_tag_id`, `custom_html_too_large`
pub async fn update_counters(
    State(state): State<AppState>,
    LenientJson(body): LenientJson,
) -> Result<Json<OkResponse>, AppError> {
    state.counters.write(Counters::from_value(&body)).await?;
    Ok(Json(OkResponse::success()))
}
