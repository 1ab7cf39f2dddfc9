//! Review HTTP handlers.
//!
//! This module implements:
//! - POST /api/review - Public submission (lands as pending)
//! - GET /api/reviews - Public list of approved reviews
//! - GET /api/admin/reviews - Admin view split by status
//! - POST /api/admin/reviews - Approve or delete

use axum::{Json, extract::State};
use serde::Serialize;

use crate::{
    error::AppError,
    extract::{LenientJson, text_field},
    handlers::OkResponse,
    models::review::{PUBLIC_REVIEW_LIMIT, Review, ReviewPartitions},
    services::{notify_service, session},
    state::AppState,
};

/// Submit a review.
///
/// # Endpoint
///
/// `POST /api/review`
///
/// # Request Body
///
/// ```json
/// { "name": "Anna", "text": "Came the same day, fridge works again." }
/// ```
///
/// `review` is accepted as an alias for `text`. A blank name is stored as
/// "Anonymous".
///
/// # Response
///
/// - **Success (200 OK)**: `{ "ok": true }`
/// - **Error (400)**: `empty_review` when the text is under 5 characters
///
/// The moderator notification is sent in the background and its outcome
/// does not affect the response.
pub async fn submit_review(
    State(state): State<AppState>,
    LenientJson(body): LenientJson,
) -> Result<Json<OkResponse>, AppError> {
    let name = text_field(&body, "name");
    let text = match text_field(&body, "text") {
        text if text.trim().is_empty() => text_field(&body, "review"),
        text => text,
    };

    let review = state
        .reviews
        .submit(&name, &text, session::now_millis())
        .await?;

    state
        .notifier
        .notify(notify_service::review_message(&review), true);

    Ok(Json(OkResponse::success()))
}

#[derive(Debug, Serialize)]
pub struct PublicReviewsResponse {
    pub ok: bool,
    pub reviews: Vec<Review>,
}

/// Approved reviews for the public page.
///
/// # Endpoint
///
/// `GET /api/reviews`
///
/// Newest first, at most 20.
pub async fn list_public_reviews(
    State(state): State<AppState>,
) -> Result<Json<PublicReviewsResponse>, AppError> {
    let reviews = state.reviews.list_approved(PUBLIC_REVIEW_LIMIT).await?;
    Ok(Json(PublicReviewsResponse { ok: true, reviews }))
}

#[derive(Debug, Serialize)]
pub struct AdminReviewsResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub partitions: ReviewPartitions,
}

/// All reviews, split into `pending` and `approved`, each newest first.
///
/// # Endpoint
///
/// `GET /api/admin/reviews`
pub async fn list_admin_reviews(
    State(state): State<AppState>,
) -> Result<Json<AdminReviewsResponse>, AppError> {
    let partitions = state.reviews.list_partitioned().await?;
    Ok(Json(AdminReviewsResponse { ok: true, partitions }))
}

/// Moderate one review.
///
/// # Endpoint
///
/// `POST /api/admin/reviews`
///
/// # Request Body
///
/// ```json
/// { "action": "approve", "id": "6f1c..." }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: the updated `pending` / `approved` lists
/// - **Error (400)**: `bad_request` (no id), `bad_action`
/// - **Error (404)**: `not_found`
pub async fn moderate_review(
    State(state): State<AppState>,
    LenientJson(body): LenientJson,
) -> Result<Json<AdminReviewsResponse>, AppError> {
    let action = text_field(&body, "action");
    let id = text_field(&body, "id");

    let partitions = state.reviews.moderate(&action, &id).await?;
    Ok(Json(AdminReviewsResponse { ok: true, partitions }))
}
