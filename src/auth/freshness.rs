//! Freshness hash for session tokens.
//!
//! Only a one-way hash of the current session token is kept at rest. A
//! presented token is current when it verifies against that hash. The hash
//! reuses the password hasher's primitive but never shares storage with it.

use super::password::PasswordHasher;
use crate::error::AppError;

pub async fn seal(hasher: &PasswordHasher, token: &str) -> Result<String, AppError> {
    hasher.hash(token).await
}

/// An empty stored hash means the user has no active session.
pub async fn is_current(
    hasher: &PasswordHasher,
    token: &str,
    stored: &str,
) -> Result<bool, AppError> {
    if stored.is_empty() {
        return Ok(false);
    }
    hasher.verify(token, stored).await
}
