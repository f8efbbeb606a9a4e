//! Handler for link shortening endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for a long URL.
///
/// # Endpoint
///
/// `POST /api/v1/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com",
///   "expires_in_seconds": 3600
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "short_url": "http://localhost:8080/abc12",
///   "short_code": "abc12",
///   "original_url": "https://example.com",
///   "expires_at": "2025-01-01T13:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for malformed JSON or a missing/invalid URL.
/// Returns 500 Internal Server Error if no code could be allocated or storage fails.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state
        .link_service
        .create_short_link(&payload.url, payload.expires_in_seconds)
        .await?;

    let short_url = state.link_service.short_url(&link.short_code);

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse::from_link(link, short_url)),
    ))
}
