//! Password hashing with Argon2.
//!
//! Hashing is deliberately slow, so both operations run on the blocking
//! thread pool instead of an async worker.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use super::error::{StorageError, StorageResult};

/// Hash a plaintext password into a salted PHC string
pub async fn hash_password(password: String) -> StorageResult<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| StorageError::PasswordHash(e.to_string()))
    })
    .await
    .map_err(|e| StorageError::Internal(format!("hashing task failed: {}", e)))?
}

/// Check a plaintext password against a stored PHC string.
///
/// Returns `Ok(false)` on mismatch; an unparsable stored hash is an error.
pub async fn verify_password(password: String, hash: String) -> StorageResult<bool> {
    tokio::task::spawn_blocking(move || {
        let parsed_hash =
            PasswordHash::new(&hash).map_err(|e| StorageError::PasswordHash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    })
    .await
    .map_err(|e| StorageError::Internal(format!("verification task failed: {}", e)))?
}
