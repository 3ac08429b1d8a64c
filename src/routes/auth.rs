use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::PublicUser;
use crate::routes::AppJson;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub name: String,
    pub email: String,
}

pub async fn register(
    State(state): State<SharedState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .auth
        .register(&req.name, &req.email, &req.password)
        .await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "User account created".to_string(),
    }))
}

/// The raw token travels only in the `Authorization` response header.
pub async fn login(
    State(state): State<SharedState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Response, AppError> {
    let email = req.email.trim();
    if let Err(retry_after) = state.login_throttle.check(email) {
        tracing::warn!("Login throttled, retry after {retry_after}s");
        return Err(AppError::RateLimited(format!(
            "Too many login attempts. Retry after {retry_after}s"
        )));
    }

    // The reserved attempt stays spent only when the password was wrong.
    let outcome = match state.auth.login(email, &req.password).await {
        Ok(outcome) => outcome,
        Err(AppError::InvalidCredentials) => return Err(AppError::InvalidCredentials),
        Err(e) => {
            state.login_throttle.release(email);
            return Err(e);
        }
    };
    state.login_throttle.reset(email);

    Ok((
        [(AUTHORIZATION, format!("Bearer {}", outcome.token))],
        Json(LoginResponse {
            success: true,
            name: outcome.name,
            email: outcome.email,
        }),
    )
        .into_response())
}

pub async fn logout(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<MessageResponse>, AppError> {
    state.auth.logout(&auth.user).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Logged out successfully".to_string(),
    }))
}

pub async fn me(auth: AuthUser) -> Json<PublicUser> {
    Json(PublicUser::from(&auth.user))
}
