//! DTOs for the redirect endpoint.

use serde::Serialize;

/// Body returned with `410 Gone` for an expired link.
///
/// The original URL is disclosed on purpose so clients can still show it.
#[derive(Debug, Serialize)]
pub struct ExpiredResponse {
    pub error: String,
    #[serde(rename = "originalUrl")]
    pub original_url: String,
}

impl ExpiredResponse {
    pub fn new(original_url: String) -> Self {
        Self {
            error: "link expired".to_string(),
            original_url,
        }
    }
}
