//! DTOs for link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten (must be an absolute URL).
    #[serde(default)]
    #[validate(length(min = 1, message = "url is required"))]
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    /// Optional lifetime in seconds. Zero or negative values mean no expiry.
    pub expires_in_seconds: Option<i64>,
}

/// Response for a created short link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_url: String,
    pub short_code: String,
    pub original_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShortenResponse {
    /// Builds the response from a stored link and its public URL.
    pub fn from_link(link: Link, short_url: String) -> Self {
        Self {
            short_url,
            short_code: link.short_code,
            original_url: link.original_url,
            expires_at: link.expires_at,
        }
    }
}
