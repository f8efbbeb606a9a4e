//! Handler for short URL redirect.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio::sync::mpsc::{Sender, error::TrySendError};
use tracing::warn;

use crate::api::dto::redirect::ExpiredResponse;
use crate::application::services::Resolution;
use crate::domain::click_event::ClickEvent;
use crate::domain::entities::Link;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Reject codes of the wrong length without touching the database
/// 2. Look up the link by code
/// 3. Answer `410 Gone` with the original URL if the link has expired
/// 4. Queue a click event and return `307 Temporary Redirect`
///
/// # Click Tracking
///
/// Click events are sent to a bounded channel for the background worker.
/// If the queue is full the click is dropped; the redirect never waits.
///
/// # Errors
///
/// Returns 404 Not Found if the code is malformed or unknown.
/// Returns 500 Internal Server Error on storage failures.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    match state.link_service.resolve(&code).await? {
        Resolution::Active(link) => {
            let location = HeaderValue::from_str(&link.original_url).map_err(|e| {
                tracing::error!(code = %link.short_code, error = %e, "Stored URL is not a valid Location header");
                AppError::internal("invalid redirect target")
            })?;

            record_click(&state.click_sender, &link);

            Ok((
                StatusCode::TEMPORARY_REDIRECT,
                [(header::LOCATION, location)],
            )
                .into_response())
        }
        Resolution::Expired(link) => Ok((
            StatusCode::GONE,
            Json(ExpiredResponse::new(link.original_url)),
        )
            .into_response()),
    }
}

/// Queues a click without waiting for queue space.
fn record_click(sender: &Sender<ClickEvent>, link: &Link) {
    match sender.try_send(ClickEvent::new(link.id, link.short_code.clone())) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            warn!(code = %event.short_code, "Click queue full, dropping click");
        }
        Err(TrySendError::Closed(event)) => {
            warn!(code = %event.short_code, "Click queue closed, dropping click");
        }
    }
}
