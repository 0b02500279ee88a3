//! Relational store access.
//!
//! The ring lives in a single `site` table whose rows reference each other
//! through `next`/`previous` columns, plus an append-only `status` table.
//! This module owns connection setup, schema creation, and the single-row
//! lookups shared by the topology engine and the registry. Multi-statement
//! splices live in [`crate::ring`] and run inside sqlx transactions.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::types::{Site, SiteId};

/// Schema for the ring store.
///
/// `next`/`previous` are nullable because a row exists without links for a
/// moment during the insert splice, but in steady state they always point at
/// another row (or the row itself, for a single-member ring).
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS site (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    url           TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    next          INTEGER REFERENCES site(id),
    previous      INTEGER REFERENCES site(id),
    valid         BOOLEAN NOT NULL DEFAULT TRUE,
    created_at    INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS status (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    site          INTEGER NOT NULL REFERENCES site(id),
    status        TEXT NOT NULL,
    created_at    INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS status_site_created ON status(site, created_at);
";

/// Opens a connection pool against the given database URL.
///
/// For file-backed databases the file is created if missing. Note that an
/// in-memory SQLite URL gives each pooled connection its own private
/// database; callers that use `sqlite::memory:` must cap the pool at one
/// connection (see `test_utils::memory_pool`).
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    SqlitePoolOptions::new().connect_with(options).await
}

/// Creates the tables if they do not exist yet.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

/// Fetches a site by id.
pub async fn site_by_id(pool: &SqlitePool, id: SiteId) -> Result<Option<Site>, sqlx::Error> {
    sqlx::query_as::<_, Site>("SELECT * FROM site WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Fetches a site by its normalized URL.
pub async fn site_by_url(pool: &SqlitePool, url: &str) -> Result<Option<Site>, sqlx::Error> {
    sqlx::query_as::<_, Site>("SELECT * FROM site WHERE url = ?")
        .bind(url)
        .fetch_optional(pool)
        .await
}

/// Fetches a site by member email.
pub async fn site_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Site>, sqlx::Error> {
    sqlx::query_as::<_, Site>("SELECT * FROM site WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Returns the total number of sites in the ring, valid or not.
pub async fn ring_len(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM site")
        .fetch_one(pool)
        .await
}
