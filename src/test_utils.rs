//! Shared test utilities.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::ring;
use crate::store;
use crate::types::SiteId;

/// Opens a fresh in-memory store with the schema applied.
///
/// In-memory SQLite databases are per-connection, so the pool is capped at
/// one connection; otherwise each checkout would see an empty database.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    store::init_schema(&pool).await.expect("schema init");
    pool
}

/// Splices a site into the ring with placeholder member data derived from
/// the URL.
pub async fn insert_test_site(pool: &SqlitePool, url: &str) -> SiteId {
    let email = format!("owner@{}", url.trim_start_matches("https://"));
    ring::insert_site(pool, url, &email, "test-hash")
        .await
        .expect("insert test site")
}
