//! Self-service membership: register, deregister, login.
//!
//! The registry validates form input, enforces URL uniqueness, and checks
//! credentials; the actual topology changes are delegated to [`crate::ring`].
//! Validation and lookup failures are recoverable and map to user-facing
//! messages in the HTTP layer; store and integrity failures surface as
//! internal errors.

pub mod password;
pub mod validation;

use sqlx::sqlite::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};

use crate::ring::{self, RingError};
use crate::store;
use crate::types::SiteId;

pub use validation::MIN_PASSWORD_LENGTH;

/// Errors from membership operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// URL is not an `http(s)://host` origin.
    #[error("malformed URL: expected http(s)://host")]
    InvalidUrl,

    /// Email fails the minimal shape check.
    #[error("malformed email address")]
    InvalidEmail,

    /// Password is below the length floor.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,

    /// The normalized URL is already a member.
    #[error("that URL is already in the webring")]
    DuplicateUrl,

    /// No member matches the given URL or email.
    #[error("no matching site in the webring")]
    NotFound,

    /// Credential mismatch. Nothing was mutated.
    #[error("incorrect password")]
    WrongPassword,

    /// Hashing the password failed (effectively unreachable for valid input).
    #[error("password hashing failed")]
    PasswordHash,

    /// Topology operation failed.
    #[error(transparent)]
    Ring(#[from] RingError),

    /// Underlying store failure.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

/// Registers a new member and splices it into the ring.
///
/// Rejects malformed input before touching the store and duplicate URLs
/// without writing. The URL is normalized (one trailing slash stripped)
/// before the uniqueness check, so `https://x.example/` and
/// `https://x.example` collide.
pub async fn register(
    pool: &SqlitePool,
    url: &str,
    email: &str,
    password: &str,
) -> Result<SiteId, RegistryError> {
    if !validation::is_valid_url(url) {
        return Err(RegistryError::InvalidUrl);
    }
    if !validation::is_valid_email(email) {
        return Err(RegistryError::InvalidEmail);
    }
    if !validation::is_valid_password(password) {
        return Err(RegistryError::PasswordTooShort);
    }

    let url = validation::normalize_url(url);
    if store::site_by_url(pool, url).await?.is_some() {
        return Err(RegistryError::DuplicateUrl);
    }

    let password_hash =
        password::hash_password(password).map_err(|_| RegistryError::PasswordHash)?;

    // The pre-check above races against concurrent registrations; the UNIQUE
    // constraint on `url` is the backstop.
    let id = ring::insert_site(pool, url, email, &password_hash)
        .await
        .map_err(|e| match e {
            RingError::Store(err) if is_unique_violation(&err) => RegistryError::DuplicateUrl,
            other => RegistryError::Ring(other),
        })?;

    info!(site_id = %id, url, "registered new site");
    Ok(id)
}

/// Removes a member after checking its credential.
///
/// A wrong password fails before any mutation; the ring topology is
/// untouched.
pub async fn deregister(pool: &SqlitePool, url: &str, password: &str) -> Result<(), RegistryError> {
    if !validation::is_valid_url(url) {
        return Err(RegistryError::InvalidUrl);
    }
    if !validation::is_valid_password(password) {
        return Err(RegistryError::PasswordTooShort);
    }

    let url = validation::normalize_url(url);
    let site = store::site_by_url(pool, url)
        .await?
        .ok_or(RegistryError::NotFound)?;

    if !password::verify_password(password, &site.password_hash) {
        warn!(site_id = %site.id, "deregistration rejected: wrong password");
        return Err(RegistryError::WrongPassword);
    }

    ring::remove_site(pool, site.id).await?;
    info!(site_id = %site.id, url, "deregistered site");
    Ok(())
}

/// Checks a member's credential by email and returns their site id.
///
/// Session mechanics belong to the HTTP layer; the registry only answers
/// "who is this".
pub async fn login(pool: &SqlitePool, email: &str, password: &str) -> Result<SiteId, RegistryError> {
    if !validation::is_valid_email(email) {
        return Err(RegistryError::InvalidEmail);
    }

    let site = store::site_by_email(pool, email)
        .await?
        .ok_or(RegistryError::NotFound)?;

    if !password::verify_password(password, &site.password_hash) {
        warn!(site_id = %site.id, "login rejected: wrong password");
        return Err(RegistryError::WrongPassword);
    }

    Ok(site.id)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}
