//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, StoreError};

/// Embedded schema migrations from `./migrations`.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Name of the unique constraint on `links.short_code`.
const SHORT_CODE_CONSTRAINT: &str = "links_short_code_key";

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    short_code: String,
    original_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    click_count: i64,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link {
            id: row.id,
            short_code: row.short_code,
            original_url: row.original_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
            expires_at: row.expires_at,
            click_count: row.click_count,
        }
    }
}

/// Classifies driver errors into [`StoreError`] kinds.
///
/// Only a unique violation on the short code constraint is a conflict; every
/// other database error is a plain storage failure.
impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if matches!(e, sqlx::Error::RowNotFound) {
            return StoreError::NotFound;
        }

        let is_code_conflict = e.as_database_error().is_some_and(|db| {
            db.is_unique_violation() && db.constraint() == Some(SHORT_CODE_CONSTRAINT)
        });
        if is_code_conflict {
            return StoreError::Conflict;
        }

        StoreError::storage(e)
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// All statements are parameterized; the pool is shared with the rest of the
/// service.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, StoreError> {
        let row: LinkRow = sqlx::query_as(
            r#"
            INSERT INTO links (short_code, original_url, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, short_code, original_url, created_at, updated_at, expires_at, click_count
            "#,
        )
        .bind(&new_link.short_code)
        .bind(&new_link.original_url)
        .bind(new_link.expires_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Link, StoreError> {
        let row: Option<LinkRow> = sqlx::query_as(
            r#"
            SELECT id, short_code, original_url, created_at, updated_at, expires_at, click_count
            FROM links
            WHERE short_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Link::from).ok_or(StoreError::NotFound)
    }

    async fn increment_clicks(&self, id: i64) -> Result<(), StoreError> {
        // A single UPDATE holds the row lock across the read-modify-write.
        sqlx::query("UPDATE links SET click_count = click_count + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        MIGRATOR
            .run(self.pool.as_ref())
            .await
            .map_err(StoreError::storage)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
