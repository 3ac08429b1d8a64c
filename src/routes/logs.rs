use bytes::Bytes;
use axum::extract::{Path, State};
use axum::Json;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::logs::{query, Page, QueryRequest};
use crate::models::LogEntry;
use crate::state::SharedState;

/// An empty body means "no filter, default page".
fn parse_request(body: &[u8]) -> Result<QueryRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(QueryRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Invalid query: {e}")))
}

/// Page and count in the body.
pub async fn fetch(
    auth: AuthUser,
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Vec<LogEntry>>, AppError> {
    let request = parse_request(&body)?;
    let page = Page::resolve(request.page, request.count, &state.config.paging);
    let entries = query::run(state.store.as_ref(), &auth.user, request.query, page).await?;
    Ok(Json(entries))
}

/// Page and count in the path. Segments that are not integers fall back to
/// the defaults.
pub async fn fetch_paged(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path((page, count)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<Vec<LogEntry>>, AppError> {
    let request = parse_request(&body)?;
    let page = Page::resolve(page.parse().ok(), count.parse().ok(), &state.config.paging);
    let entries = query::run(state.store.as_ref(), &auth.user, request.query, page).await?;
    Ok(Json(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_default_request() {
        let request = parse_request(b"").unwrap();
        assert!(request.page.is_none());
        assert!(request.query.level.is_none());
    }

    #[test]
    fn body_fields_are_read() {
        let request =
            parse_request(br#"{"query": {"level": "error"}, "page": 2, "count": 5}"#).unwrap();
        assert_eq!(request.page, Some(2));
        assert_eq!(request.count, Some(5));
        assert_eq!(request.query.level.as_deref(), Some("error"));
    }

    #[test]
    fn invalid_json_is_bad_request() {
        assert!(matches!(
            parse_request(b"{oops"),
            Err(AppError::BadRequest(_))
        ));
    }
}
