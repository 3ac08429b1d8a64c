//! Registration, login and per-request token verification.

use uuid::Uuid;

use super::freshness;
use super::jwt::TokenCodec;
use super::password::PasswordHasher;
use crate::access::Role;
use crate::error::AppError;
use crate::models::{NewUser, User};
use crate::store::{SharedStore, StoreError};

/// Result of a successful login. Only `token` is sensitive and it is never
/// persisted.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub name: String,
    pub email: String,
}

pub struct AuthService {
    store: SharedStore,
    hasher: PasswordHasher,
    codec: TokenCodec,
    /// Verified against when the email is unknown, so both login failures cost
    /// the same.
    decoy_hash: String,
}

impl AuthService {
    pub fn new(
        store: SharedStore,
        hasher: PasswordHasher,
        codec: TokenCodec,
    ) -> Result<Self, String> {
        let decoy_hash = hasher.hash_blocking("decoy password")?;
        Ok(Self {
            store,
            hasher,
            codec,
            decoy_hash,
        })
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::IncompleteData(
                "Name, email and password are required".to_string(),
            ));
        }

        if self.store.find_user_by_email(email).await?.is_some() {
            return Err(AppError::DuplicateUser);
        }

        let password_hash = self.hasher.hash(password).await?;
        let user = self
            .store
            .create_user(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
                role: Role::Developer,
            })
            .await
            .map_err(|e| match e {
                StoreError::DuplicateEmail => AppError::DuplicateUser,
                other => AppError::Storage(other),
            })?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Mint a new session token and overwrite the stored freshness hash,
    /// which invalidates every earlier token for this user.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::IncompleteData(
                "Email and password are required".to_string(),
            ));
        }

        let Some(user) = self.store.find_user_by_email(email).await? else {
            self.hasher.verify(password, &self.decoy_hash).await?;
            return Err(AppError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.codec.sign(user.id).map_err(AppError::Internal)?;
        let seal = freshness::seal(&self.hasher, &token).await?;
        self.store.update_user_token(user.id, &seal).await?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginOutcome {
            token,
            name: user.name,
            email: user.email,
        })
    }

    /// Resolve a presented bearer token to its user. Pure check: nothing is
    /// rotated or written.
    pub async fn verify(&self, raw_token: &str) -> Result<User, AppError> {
        let claims = self.codec.verify(raw_token).map_err(|e| {
            tracing::debug!("Token rejected: {e}");
            AppError::MalformedToken
        })?;

        let user = self
            .store
            .find_user_by_id(claims.sub)
            .await?
            .ok_or(AppError::UnknownUser)?;

        if !freshness::is_current(&self.hasher, raw_token, &user.session_token_hash).await? {
            return Err(AppError::StaleToken);
        }

        Ok(user)
    }

    /// Clear the stored freshness hash so no token verifies until next login.
    pub async fn logout(&self, user: &User) -> Result<(), AppError> {
        self.store.update_user_token(user.id, "").await?;
        tracing::info!(user_id = %user.id, "User logged out");
        Ok(())
    }

    pub async fn assign_role(
        &self,
        caller: &User,
        target: Uuid,
        role: &str,
    ) -> Result<User, AppError> {
        if caller.role != Role::Admin {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        let role: Role = role.parse()?;

        let user = self
            .store
            .update_user_role(target, role)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AppError::UnknownUser,
                other => AppError::Storage(other),
            })?;

        tracing::info!(user_id = %user.id, %role, by = %caller.id, "Role changed");
        Ok(user)
    }
}
