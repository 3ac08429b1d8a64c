//! Postgres store backend.

use sqlx::PgPool;
use uuid::Uuid;

use crate::access::Role;
use crate::db;
use crate::models::{LogEntry, NewLogEntry, NewUser, User};

use super::{LogQuery, Store, StoreError};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        db::users::find_by_email(&self.pool, email)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        db::users::find_by_id(&self.pool, id)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        // Advisory lock serialises the "first user becomes admin" check
        let mut tx = self.pool.begin().await?;
        sqlx::query("SELECT pg_advisory_xact_lock(1)")
            .execute(&mut *tx)
            .await?;

        let role = if db::users::count_all(&mut *tx).await? == 0 {
            Role::Admin
        } else {
            user.role
        };

        let row = db::users::create(
            &mut *tx,
            Uuid::now_v7(),
            &user.name,
            &user.email,
            &user.password_hash,
            role.as_str(),
        )
        .await?;

        tx.commit().await?;
        User::try_from(row)
    }

    async fn update_user_token(&self, id: Uuid, token_hash: &str) -> Result<(), StoreError> {
        match db::users::update_session_token_hash(&self.pool, id, token_hash).await? {
            0 => Err(StoreError::NotFound),
            _ => Ok(()),
        }
    }

    async fn update_user_role(&self, id: Uuid, role: Role) -> Result<User, StoreError> {
        db::users::update_role(&self.pool, id, role.as_str())
            .await?
            .ok_or(StoreError::NotFound)
            .and_then(User::try_from)
    }

    async fn insert_log(&self, entry: NewLogEntry) -> Result<LogEntry, StoreError> {
        let row = db::logs::insert(&self.pool, Uuid::now_v7(), &entry).await?;
        Ok(row.into())
    }

    async fn query_logs(&self, query: &LogQuery) -> Result<Vec<LogEntry>, StoreError> {
        let rows = db::logs::query(&self.pool, query).await?;
        Ok(rows.into_iter().map(LogEntry::from).collect())
    }
}
