//! Persistence boundary for users and log entries.

mod error;
mod memory;
mod postgres;

use std::sync::Arc;

use uuid::Uuid;

use crate::access::Role;
use crate::models::{LogEntry, LogFilter, NewLogEntry, NewUser, User};

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type SharedStore = Arc<dyn Store>;

/// A fully resolved log query: caller filter, visibility floor and window.
///
/// Results are always ordered by timestamp ascending, then insertion order.
#[derive(Debug, Clone)]
pub struct LogQuery {
    pub filter: LogFilter,
    /// Visibility rank of the caller; see [`crate::access::is_visible`].
    pub caller_rank: i16,
    pub skip: i64,
    pub limit: i64,
}

/// Single source of truth for users and logs.
///
/// Implementations must be `Send + Sync`; every method is one atomic store
/// operation.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Insert a user. Fails with [`StoreError::DuplicateEmail`] when the email
    /// is taken. The first user of an empty store is created as admin
    /// regardless of `user.role`.
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// Overwrite the user's session freshness hash. An empty hash signs the
    /// user out.
    async fn update_user_token(&self, id: Uuid, token_hash: &str) -> Result<(), StoreError>;

    async fn update_user_role(&self, id: Uuid, role: Role) -> Result<User, StoreError>;

    async fn insert_log(&self, entry: NewLogEntry) -> Result<LogEntry, StoreError>;

    async fn query_logs(&self, query: &LogQuery) -> Result<Vec<LogEntry>, StoreError>;
}
