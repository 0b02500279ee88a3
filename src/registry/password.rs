//! Password hashing at the credential-check boundary.
//!
//! Credentials are stored as argon2id hashes in PHC string format with a
//! random per-password salt. Verification re-derives from the stored string,
//! so the external success/failure contract is just "does this password
//! match".

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hashes a password with a freshly generated salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC hash string.
///
/// An unparseable stored hash counts as a mismatch rather than an error:
/// the caller only ever needs "matched or not".
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
