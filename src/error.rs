use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::store::StoreError;

/// Every way a request can be rejected.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Incomplete data: {0}")]
    IncompleteData(String),
    #[error("A user with this email already exists")]
    DuplicateUser,
    /// Unknown email and wrong password both end up here.
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    MalformedToken,
    #[error("Token subject does not exist")]
    UnknownUser,
    #[error("Session has been superseded")]
    StaleToken,
    #[error("Unknown role: {0}")]
    UnknownRole(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Rate Limited: {0}")]
    RateLimited(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("Internal Error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::IncompleteData(_) | AppError::BadRequest(_) | AppError::UnknownRole(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::DuplicateUser => StatusCode::CONFLICT,
            AppError::InvalidCredentials
            | AppError::MalformedToken
            | AppError::UnknownUser
            | AppError::StaleToken
            | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable tag carried in the `type` field of error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::IncompleteData(_) => "incompleteData",
            AppError::DuplicateUser => "duplicateUser",
            AppError::InvalidCredentials => "invalidCredentials",
            AppError::MalformedToken => "malformedToken",
            AppError::UnknownUser => "unknownUser",
            AppError::StaleToken => "staleToken",
            AppError::UnknownRole(_) => "unknownRole",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::BadRequest(_) => "badRequest",
            AppError::RateLimited(_) => "rateLimited",
            AppError::Storage(_) => "storageError",
            AppError::Internal(_) => "serverError",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Storage(err) => {
                tracing::error!("Storage error: {err}");
                "Internal server error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                "Internal server error".to_string()
            }
            AppError::IncompleteData(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::RateLimited(msg) => msg.clone(),
            other => other.to_string(),
        };

        let body = json!({ "type": self.kind(), "error": message });
        (self.status(), axum::Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Background task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_share_unauthorized_status() {
        for err in [
            AppError::InvalidCredentials,
            AppError::MalformedToken,
            AppError::UnknownUser,
            AppError::StaleToken,
        ] {
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn storage_errors_hide_details() {
        let resp = AppError::Storage(StoreError::Corrupt("bad row".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["type"], "storageError");
        assert_eq!(body["error"], "Internal server error");
        assert!(!bytes.windows(7).any(|w| w == b"bad row"));
    }

    #[test]
    fn kinds_are_camel_case_tags() {
        assert_eq!(AppError::DuplicateUser.kind(), "duplicateUser");
        assert_eq!(AppError::StaleToken.kind(), "staleToken");
        assert_eq!(AppError::UnknownRole("root".into()).kind(), "unknownRole");
    }
}
