//! Ring topology engine.
//!
//! Maintains the doubly-linked cycle of member sites stored in the `site`
//! table: splicing new members in, splicing departing members out, and the
//! read-side queries over the ring. Valid-neighbor traversal lives in
//! [`traversal`].
//!
//! # Topology invariants
//!
//! - With at least one member, every site sits on exactly one cycle:
//!   following `next` from any site eventually returns to it.
//! - `next` and `previous` are mutual inverses.
//! - A single-member ring self-loops (`next == previous == id`).
//!
//! The cycle is always fully closed. The splice point for insertion is the
//! site with the greatest id: ids are store-assigned and monotonic, so that
//! site is the most recently registered survivor, and inserting between it
//! and its `next` keeps the ring in registration order even after removals.
//!
//! # Atomicity
//!
//! Every multi-statement splice runs inside a single sqlx transaction.
//! SQLite permits one writer at a time, so the find-splice-point read and
//! the link writes cannot interleave with a concurrent insert; two requests
//! cannot both splice after the same tail.

pub mod traversal;

use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use thiserror::Error;
use tracing::debug;

use crate::types::{Site, SiteId};

pub use traversal::{find_next_valid, find_previous_valid};

/// Upper clamp on caller-supplied listing page sizes.
pub const MAX_LIST_LIMIT: i64 = 100;

/// Errors from topology operations.
#[derive(Debug, Error)]
pub enum RingError {
    /// Underlying store failure.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// A row that was just read or written cannot be found again. Surfaced
    /// as an internal failure; never retried.
    #[error("site {0} vanished mid-operation")]
    SiteVanished(SiteId),

    /// A site that should be linked into the cycle has no neighbor link.
    #[error("site {0} is not linked into the ring")]
    Unlinked(SiteId),
}

/// Persists a new site and splices it into the ring.
///
/// The candidate must already be validated and its URL confirmed absent;
/// this function only owns the topology. Empty ring: the new site becomes a
/// self-loop. Otherwise the new site is linked between the current tail T
/// (greatest id) and T's `next`, closing the cycle in both directions.
pub async fn insert_site(
    pool: &SqlitePool,
    url: &str,
    email: &str,
    password_hash: &str,
) -> Result<SiteId, RingError> {
    let mut tx = pool.begin().await?;

    let id: SiteId = sqlx::query_scalar(
        "INSERT INTO site (url, email, password_hash, valid, created_at) \
         VALUES (?, ?, ?, TRUE, ?) RETURNING id",
    )
    .bind(url)
    .bind(email)
    .bind(password_hash)
    .bind(Utc::now().timestamp())
    .fetch_one(&mut *tx)
    .await?;

    let tail = sqlx::query_as::<_, Site>(
        "SELECT * FROM site WHERE id != ? ORDER BY id DESC LIMIT 1",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    match tail {
        None => {
            // Empty ring: the sole member is its own neighbor.
            sqlx::query("UPDATE site SET next = ?, previous = ? WHERE id = ?")
                .bind(id)
                .bind(id)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        Some(tail) => {
            let head = tail.next.ok_or(RingError::Unlinked(tail.id))?;
            sqlx::query("UPDATE site SET next = ? WHERE id = ?")
                .bind(id)
                .bind(tail.id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("UPDATE site SET previous = ?, next = ? WHERE id = ?")
                .bind(tail.id)
                .bind(head)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("UPDATE site SET previous = ? WHERE id = ?")
                .bind(id)
                .bind(head)
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;
    debug!(site_id = %id, url, "spliced site into ring");
    Ok(id)
}

/// Splices a site out of the ring and deletes its row.
///
/// The row is re-read inside the transaction so the splice uses the site's
/// current neighbors; a snapshot taken before the transaction could be
/// stale if another splice landed in between. Re-links the neighbors
/// (`previous.next = site.next`, `next.previous = site.previous`) before
/// the delete. A self-looped single member needs no special branch: the
/// neighbor updates land on the row about to be deleted.
pub async fn remove_site(pool: &SqlitePool, id: SiteId) -> Result<(), RingError> {
    let mut tx = pool.begin().await?;

    let site = sqlx::query_as::<_, Site>("SELECT * FROM site WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RingError::SiteVanished(id))?;

    sqlx::query("UPDATE site SET next = ? WHERE id = ?")
        .bind(site.next)
        .bind(site.previous)
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE site SET previous = ? WHERE id = ?")
        .bind(site.previous)
        .bind(site.next)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM site WHERE id = ?")
        .bind(site.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    debug!(site_id = %site.id, url = %site.url, "spliced site out of ring");
    Ok(())
}

/// Toggles whether a site participates in traversal and listing output.
/// The site stays physically linked either way.
pub async fn set_valid(pool: &SqlitePool, id: SiteId, valid: bool) -> Result<(), RingError> {
    let result = sqlx::query("UPDATE site SET valid = ? WHERE id = ?")
        .bind(valid)
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RingError::SiteVanished(id));
    }
    Ok(())
}

/// Returns valid sites ordered by ascending id, paginated.
///
/// `limit` is clamped to [`MAX_LIST_LIMIT`]; negative offsets are treated
/// as zero.
pub async fn list_valid(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<Site>, RingError> {
    let limit = limit.clamp(0, MAX_LIST_LIMIT);
    let offset = offset.max(0);
    let sites = sqlx::query_as::<_, Site>(
        "SELECT * FROM site WHERE valid = TRUE ORDER BY id LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(sites)
}

/// Picks a uniformly random site, valid or not.
pub async fn random_site(pool: &SqlitePool) -> Result<Option<Site>, RingError> {
    let site = sqlx::query_as::<_, Site>("SELECT * FROM site ORDER BY RANDOM() LIMIT 1")
        .fetch_optional(pool)
        .await?;
    Ok(site)
}
