//! Error types for the credential and log store.

/// Errors raised by a [`Store`](super::Store) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The unique email constraint rejected an insert.
    #[error("email already registered")]
    DuplicateEmail,

    /// The targeted record does not exist.
    #[error("record not found")]
    NotFound,

    /// A persisted row could not be mapped back into a model.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateEmail,
            _ => StoreError::Database(err),
        }
    }
}
