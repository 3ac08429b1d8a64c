use bytes::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::logs::ingest;
use crate::state::SharedState;

/// Writers are not authenticated; any well-formed event is recorded.
pub async fn ingest(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let event = ingest::parse_event(&body)?;
    let entry = ingest::record(state.store.as_ref(), event).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "created",
            "id": entry.id,
        })),
    ))
}
