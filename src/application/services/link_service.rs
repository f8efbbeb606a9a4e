//! Link creation and resolution service.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use url::Url;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, StoreError};
use crate::error::AppError;
use crate::utils::code_generator::{CODE_LENGTH, CodeGenerator};

/// Number of code candidates tried before creation gives up.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 5;

/// Outcome of looking up a short code that exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The link is live and should be followed.
    Active(Link),
    /// The link exists but its expiry time has passed.
    Expired(Link),
}

/// Service for creating and resolving short links.
///
/// Owns the allocation loop (generate a code, insert, retry on collision) and
/// the redirect checks (length guard, lookup, expiry).
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    generator: Arc<dyn CodeGenerator>,
    base_url: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// Trailing slashes on `base_url` are dropped so short URLs never contain `//`.
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        generator: Arc<dyn CodeGenerator>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            repository,
            generator,
            base_url,
        }
    }

    /// Creates a short link for `original_url`.
    ///
    /// A positive `expires_in_seconds` sets `expires_at` to now plus that many
    /// seconds; zero, negative or missing values create a link that never expires.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is empty or not an absolute URL,
    /// or if the expiry is out of range. Nothing is stored in that case.
    ///
    /// Returns [`AppError::Internal`] if the random source fails, all
    /// [`MAX_ALLOCATION_ATTEMPTS`] codes collide, or the store fails.
    pub async fn create_short_link(
        &self,
        original_url: &str,
        expires_in_seconds: Option<i64>,
    ) -> Result<Link, AppError> {
        validate_url(original_url)?;
        let expires_at = expiry_from_now(Utc::now(), expires_in_seconds)?;

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let code = self.generator.generate().map_err(|e| {
                tracing::error!(error = %e, "Failed to generate short code");
                AppError::internal("failed to generate short code")
            })?;

            let new_link = NewLink {
                short_code: code,
                original_url: original_url.to_string(),
                expires_at,
            };

            match self.repository.create(new_link).await {
                Ok(link) => {
                    tracing::info!(code = %link.short_code, attempt, "Short link created");
                    return Ok(link);
                }
                Err(StoreError::Conflict) => {
                    tracing::debug!(attempt, "Short code collision, retrying");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to store short link");
                    return Err(AppError::internal("database error"));
                }
            }
        }

        tracing::error!(
            attempts = MAX_ALLOCATION_ATTEMPTS,
            "Could not allocate a unique short code"
        );
        Err(AppError::internal("could not allocate short code"))
    }

    /// Looks up a short code for redirection.
    ///
    /// Codes whose length differs from [`CODE_LENGTH`] are reported as not found
    /// without querying the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is malformed or unknown.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn resolve(&self, code: &str) -> Result<Resolution, AppError> {
        self.resolve_at(code, Utc::now()).await
    }

    /// Same as [`Self::resolve`] with an explicit clock reading.
    pub async fn resolve_at(&self, code: &str, now: DateTime<Utc>) -> Result<Resolution, AppError> {
        if code.len() != CODE_LENGTH {
            return Err(AppError::not_found("not found"));
        }

        let link = match self.repository.find_by_code(code).await {
            Ok(link) => link,
            Err(StoreError::NotFound) => return Err(AppError::not_found("not found")),
            Err(e) => {
                tracing::error!(code, error = %e, "Failed to look up short link");
                return Err(AppError::internal("database error"));
            }
        };

        if link.is_expired_at(now) {
            Ok(Resolution::Expired(link))
        } else {
            Ok(Resolution::Active(link))
        }
    }

    /// Builds the public short URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    /// Checks that the link store answers.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] with the storage error text.
    pub async fn check_storage(&self) -> Result<(), AppError> {
        self.repository
            .ping()
            .await
            .map_err(|e| AppError::internal(e.to_string()))
    }
}

/// Rejects anything that is not a syntactically valid absolute URL.
fn validate_url(original_url: &str) -> Result<(), AppError> {
    if original_url.trim().is_empty() {
        return Err(AppError::bad_request(
            "url is required",
            json!({ "field": "url" }),
        ));
    }

    if original_url.chars().any(char::is_control) {
        return Err(AppError::bad_request(
            "invalid URL format",
            json!({ "reason": "control characters are not allowed" }),
        ));
    }

    Url::parse(original_url).map_err(|e| {
        AppError::bad_request("invalid URL format", json!({ "reason": e.to_string() }))
    })?;

    Ok(())
}

/// Computes the absolute expiry for a relative lifetime in seconds.
fn expiry_from_now(
    now: DateTime<Utc>,
    expires_in_seconds: Option<i64>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    let Some(seconds) = expires_in_seconds.filter(|s| *s > 0) else {
        return Ok(None);
    };

    Duration::try_seconds(seconds)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .map(Some)
        .ok_or_else(|| {
            AppError::bad_request(
                "expires_in_seconds is out of range",
                json!({ "expires_in_seconds": seconds }),
            )
        })
}
