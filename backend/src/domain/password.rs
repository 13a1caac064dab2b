//! Password hashing helpers (argon2id).
//!
//! Hashes are stored as PHC strings, so parameters and salt travel with the
//! hash and verification needs no extra configuration.

use argon2::Argon2;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand_core::OsRng;

use crate::domain::Error;

/// Hash a plaintext password with argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|error| Error::internal(format!("failed to hash password: {error}")))
}

/// Verify a password attempt against a stored PHC hash string.
///
/// An unparseable stored hash counts as a failed verification rather than an
/// error so login cannot be used to probe for corrupt rows.
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
