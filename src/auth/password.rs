//! Password hashing and verification
//!
//! Uses bcrypt for secure password hashing.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AppError;

/// Hash a password using bcrypt
///
/// The credential table ships pre-hashed entries; this is the tool that
/// produces them.
#[allow(dead_code)]
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored hash
///
/// A malformed stored hash counts as a mismatch, never an error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    verify(password, hash).unwrap_or(false)
}
