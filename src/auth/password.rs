use bcrypt::{hash, verify};

use crate::error::AppError;

/// Hashes `password` with a fresh salt on the blocking pool.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash(password, cost))
        .await
        .map_err(|e| AppError::InternalError(format!("hashing task failed: {}", e)))?
        .map_err(AppError::from)
}

/// Checks `password` against a stored bcrypt hash on the blocking pool.
pub async fn verify_password(password: String, password_hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify(password, &password_hash))
        .await
        .map_err(|e| AppError::InternalError(format!("verification task failed: {}", e)))?
        .map_err(AppError::from)
}
