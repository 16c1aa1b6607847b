/// Password hashing and verification using Argon2id.
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};

use crate::error::{ApiError, Result};

/// Hash a plaintext password with a fresh random salt. Two calls on the same
/// input produce different hashes.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(rand::thread_rng());

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|_| ApiError::Dependency("failed to hash password".to_string()))
}

/// Verify a plaintext password against a stored hash. The comparison inside
/// argon2 does not leak the position of a mismatch. Returns `Ok(false)` on a
/// clean mismatch; a malformed stored hash is a dependency failure.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|_| ApiError::Dependency("stored password hash is malformed".to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Minimum requirements for a new password: at least 8 characters, with an
/// uppercase letter, a lowercase letter and a digit.
pub fn validate_password_strength(password: &str) -> Result<()> {
    let long_enough = password.len() >= 8;
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if long_enough && has_upper && has_lower && has_digit {
        Ok(())
    } else {
        Err(ApiError::Validation(
            "password must be at least 8 characters and mix upper case, lower case and digits"
                .to_string(),
        ))
    }
}
