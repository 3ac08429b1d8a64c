pub mod auth;
pub mod ingest;
pub mod logs;
pub mod users;

use axum::extract::FromRequest;
use axum::routing::{get, post, put};
use axum::Router;

use crate::error::AppError;
use crate::state::SharedState;

/// `Json` whose rejections render as [`AppError`] bodies.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/me", get(auth::me))
        // Users
        .route("/api/v1/users/{id}/role", put(users::update_role))
        // Logs
        .route("/api/v1/logs/fetch", post(logs::fetch))
        .route("/api/v1/logs/fetch/{page}/{count}", post(logs::fetch_paged))
}

pub fn ingest_routes() -> Router<SharedState> {
    Router::new()
        .route("/", post(ingest::ingest))
        .route("/api/v1/logs", post(ingest::ingest))
}
