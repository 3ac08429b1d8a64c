pub mod access;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logs;
pub mod models;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod store;

use std::sync::Arc;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::auth::jwt::TokenCodec;
use crate::auth::password::PasswordHasher;
use crate::auth::AuthService;
use crate::config::Config;
use crate::rate_limit::LoginThrottle;
use crate::state::{AppState, SharedState};
use crate::store::SharedStore;

pub fn build_state(store: SharedStore, config: Config) -> Result<SharedState, String> {
    let hasher = PasswordHasher::new(config.hash)?;
    let codec = TokenCodec::new(&config.jwt_secret, config.token_ttl);
    let auth = AuthService::new(store.clone(), hasher, codec)?;

    Ok(Arc::new(AppState {
        store,
        login_throttle: LoginThrottle::new(config.login_throttle),
        auth,
        config,
    }))
}

pub fn build_app(state: SharedState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .expose_headers([AUTHORIZATION]);

    let max_body_size = state.config.max_body_size;

    Router::new()
        .merge(routes::api_routes())
        .merge(routes::ingest_routes())
        .route("/health", axum::routing::get(health))
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
