//! In-memory store backend.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::access::{self, Role};
use crate::models::{LogEntry, NewLogEntry, NewUser, User};

use super::{LogQuery, Store, StoreError};

/// Store backed by `RwLock`-guarded maps.
///
/// Used by `LOGSCOPE_STORE=memory` and throughout the test suite. Nothing
/// survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    logs: RwLock<Vec<LogEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let role = if users.is_empty() { Role::Admin } else { user.role };
        let created = User {
            id: Uuid::now_v7(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role,
            session_token_hash: String::new(),
            created_at: Utc::now(),
        };
        debug!(user_id = %created.id, %role, "created user in memory");
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_user_token(&self, id: Uuid, token_hash: &str) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.session_token_hash = token_hash.to_string();
        Ok(())
    }

    async fn update_user_role(&self, id: Uuid, role: Role) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.role = role;
        Ok(user.clone())
    }

    async fn insert_log(&self, entry: NewLogEntry) -> Result<LogEntry, StoreError> {
        let mut logs = self.logs.write().await;
        let stored = LogEntry {
            id: Uuid::now_v7(),
            level: entry.level,
            message: entry.message,
            resource_id: entry.resource_id,
            timestamp: entry.timestamp,
            trace_id: entry.trace_id,
            span_id: entry.span_id,
            commit: entry.commit,
            metadata: entry.metadata,
            access: entry.access,
            seq: logs.len() as i64 + 1,
        };
        logs.push(stored.clone());
        Ok(stored)
    }

    async fn query_logs(&self, query: &LogQuery) -> Result<Vec<LogEntry>, StoreError> {
        let logs = self.logs.read().await;
        let mut matching: Vec<&LogEntry> = logs
            .iter()
            .filter(|e| {
                access::is_visible(query.caller_rank, e.access) && query.filter.matches(e)
            })
            .collect();
        matching.sort_by_key(|e| (e.timestamp, e.seq));

        Ok(matching
            .into_iter()
            .skip(query.skip.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .cloned()
            .collect())
    }
}
