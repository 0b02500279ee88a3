//! Member status posts.
//!
//! An append-only feed: a member posts short free-text statuses and the
//! newest one per site is what gets surfaced. Nothing here mutates or
//! deletes existing rows.

use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use thiserror::Error;
use tracing::debug;

use crate::types::{SiteId, StatusId, StatusRecord};

/// Maximum accepted status length, in characters.
pub const MAX_STATUS_LENGTH: usize = 256;

/// Errors from status operations.
#[derive(Debug, Error)]
pub enum StatusError {
    /// Status text exceeds [`MAX_STATUS_LENGTH`]. Rejected before any write.
    #[error("status exceeds {MAX_STATUS_LENGTH} characters")]
    TooLong,

    /// Underlying store failure.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

/// Appends a status post for a site.
pub async fn post_status(
    pool: &SqlitePool,
    site: SiteId,
    text: &str,
) -> Result<StatusId, StatusError> {
    if text.chars().count() > MAX_STATUS_LENGTH {
        return Err(StatusError::TooLong);
    }

    let id: StatusId = sqlx::query_scalar(
        "INSERT INTO status (site, status, created_at) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(site)
    .bind(text)
    .bind(Utc::now().timestamp())
    .fetch_one(pool)
    .await?;

    debug!(site_id = %site, status_id = %id, "posted status");
    Ok(id)
}

/// Returns the most recent status for a site, if any.
pub async fn latest_status(
    pool: &SqlitePool,
    site: SiteId,
) -> Result<Option<StatusRecord>, StatusError> {
    let record = sqlx::query_as::<_, StatusRecord>(
        "SELECT * FROM status WHERE site = ? ORDER BY created_at DESC, id DESC LIMIT 1",
    )
    .bind(site)
    .fetch_optional(pool)
    .await?;
    Ok(record)
}

/// Returns a site's full status history, newest first.
pub async fn statuses_for(
    pool: &SqlitePool,
    site: SiteId,
) -> Result<Vec<StatusRecord>, StatusError> {
    let records = sqlx::query_as::<_, StatusRecord>(
        "SELECT * FROM status WHERE site = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(site)
    .fetch_all(pool)
    .await?;
    Ok(records)
}
