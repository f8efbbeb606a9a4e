//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use async_trait::async_trait;

/// Boxed cause of a storage failure.
pub type StorageCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure kinds surfaced by a [`LinkRepository`].
///
/// Backend specific errors are classified into these kinds once, inside the
/// repository implementation. Callers never look at driver error codes.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No link matches the requested short code.
    #[error("link not found")]
    NotFound,

    /// The short code is already taken.
    #[error("short code already exists")]
    Conflict,

    /// Any other storage failure.
    #[error("storage error: {0}")]
    Storage(#[source] StorageCause),
}

impl StoreError {
    /// Wraps an arbitrary error as [`StoreError::Storage`].
    pub fn storage(cause: impl Into<StorageCause>) -> Self {
        Self::Storage(cause.into())
    }
}

/// Persistence contract for short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the short code already exists.
    /// Returns [`StoreError::Storage`] on any other database error.
    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError>;

    /// Finds a link by exact short code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no link has this code.
    /// Returns [`StoreError::Storage`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Link, StoreError>;

    /// Atomically adds one to the click counter of the link with `id`.
    ///
    /// Concurrent increments on the same link are serialized by the store, so
    /// none are lost. Never creates or deletes rows; an unknown `id` is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] on database errors.
    async fn increment_clicks(&self, id: i64) -> Result<(), StoreError>;

    /// Ensures the link schema exists. Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if a migration fails.
    async fn migrate(&self) -> Result<(), StoreError>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the store cannot be queried.
    async fn ping(&self) -> Result<(), StoreError>;
}
