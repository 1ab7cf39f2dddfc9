//! Call-back request handler.

use axum::{Json, extract::State};

use crate::{
    error::AppError,
    extract::LenientJson,
    handlers::OkResponse,
    models::lead::LeadRequest,
    services::notify_service,
    state::AppState,
};

/// Forward a call-back request to the operator chat.
///
/// # Endpoint
///
/// `POST /api/lead`
///
/// # Request Body
///
/// ```json
/// { "name": "Ivan", "phone": "+7 900 000-00-00", "model": "Atlant", "problem": "Not cooling" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ "ok": true }` once the relay accepted the message
/// - **Error (400)**: `bad_request` (body is not a JSON object), `invalid_phone`
/// - **Error (500)**: `tg_not_configured`
/// - **Error (502)**: `tg_error` with the relay's answer in `details`
///
/// Nothing is stored; the relay message is the only record of the lead.
pub async fn submit_lead(
    State(state): State<AppState>,
    LenientJson(body): LenientJson,
) -> Result<Json<OkResponse>, AppError> {
    if !body.is_object() {
        return Err(AppError::BadRequest);
    }

    let lead = LeadRequest::from_value(&body);
    if !lead.has_valid_phone() {
        return Err(AppError::InvalidPhone);
    }

    let message = notify_service::lead_message(&lead, chrono::Utc::now());
    state.notifier.send(&message, false).await?;

    tracing::info!("lead forwarded");
    Ok(Json(OkResponse::success()))
}
