//! Argon2 password hashing.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

use crate::server::error::AppError;

/// Hashes `password` with Argon2 defaults and a random 16 byte salt.
///
/// # Returns
/// - `Ok(String)` - PHC string, e.g. `$argon2id$v=19$...`
/// - `Err(AppError::InternalError)` - No randomness available or hashing failed
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes)
        .map_err(|e| AppError::InternalError(format!("salt generation failed: {e}")))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::InternalError(format!("salt encoding failed: {e}")))?;

    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::InternalError(format!("password hashing failed: {e}")))?;

    Ok(phc.to_string())
}

/// Checks `password` against a stored PHC string. An unparsable hash never matches.
pub fn verify_password(password: &str, phc: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
