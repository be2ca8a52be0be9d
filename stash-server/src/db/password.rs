//! Password hashing using Argon2id
//!
//! Hashes are stored in PHC string format. A fast mode exists for tests:
//! `hash_password(password, true)` yields `$FAST$<password>`, which
//! `verify_password` recognizes and compares directly.
//!
//! **Never enable fast mode in production** - it stores passwords in plaintext.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use stash_common::validators;
use thiserror::Error;

/// Prefix for fast (test-only) password hashes
const FAST_HASH_PREFIX: &str = "$FAST$";

/// Error type for password operations
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Password validation failed
    #[error("invalid password: {0:?}")]
    Validation(validators::PasswordError),
    /// Hashing or verification failed
    #[error("{0}")]
    Hash(#[from] argon2::password_hash::Error),
}

/// Hash a password chosen at sign-up
///
/// # Errors
///
/// Returns `PasswordError::Validation` if the password breaks the sign-up
/// rules, or `PasswordError::Hash` if Argon2 fails.
pub fn hash_password(password: &str, fast: bool) -> Result<String, PasswordError> {
    // Handlers validate first; this catches anything that slipped past them
    validators::validate_password(password).map_err(PasswordError::Validation)?;

    if fast {
        return Ok(format!("{FAST_HASH_PREFIX}{password}"));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

/// Verify a password against a stored hash
///
/// Detects the hash type from its prefix. Argon2 comparison is constant
/// time; fast hashes are compared directly and only ever exist in tests.
///
/// # Errors
///
/// Returns an error if the password is too long or the stored hash is
/// malformed. A wrong password is `Ok(false)`.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PasswordError> {
    validators::validate_password_input(password).map_err(PasswordError::Validation)?;

    if let Some(stored) = password_hash.strip_prefix(FAST_HASH_PREFIX) {
        return Ok(stored == password);
    }

    let parsed_hash = PasswordHash::new(password_hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Hash(e)),
    }
}
