//! Validation and recording of inbound log events.

use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;

use crate::access::{self, LOWEST_PRIVILEGE_RANK};
use crate::error::AppError;
use crate::models::{LogEntry, LogMetadata, NewLogEntry};
use crate::store::Store;

const EARLIEST_YEAR: i32 = 1;

/// A loosely structured event as it arrives on the wire. Unknown keys are
/// ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLogEvent {
    pub level: Option<String>,
    pub message: Option<String>,
    pub resource_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub trace_id: Option<String>,
    pub span_id: Option<String>,
    pub commit: Option<String>,
    pub metadata: Option<LogMetadata>,
    pub access: Option<i64>,
}

impl RawLogEvent {
    /// Fill defaults: ingestion time for `timestamp`, lowest privilege for
    /// `access`.
    pub fn into_entry(self, now: DateTime<Utc>) -> NewLogEntry {
        NewLogEntry {
            level: self.level,
            message: self.message,
            resource_id: self.resource_id,
            timestamp: self.timestamp.unwrap_or(now),
            trace_id: self.trace_id,
            span_id: self.span_id,
            commit: self.commit,
            metadata: self.metadata.unwrap_or_default(),
            access: self
                .access
                .map(access::clamp_access)
                .unwrap_or(LOWEST_PRIVILEGE_RANK),
        }
    }
}

impl RawLogEvent {
    /// Both stores must accept whatever passes here. Text may not contain NUL
    /// and timestamps must fall in the common era.
    fn check_storable(&self) -> Result<(), AppError> {
        let parent = self.metadata.as_ref().and_then(|m| m.parent_resource_id.clone());
        let text = [
            ("level", &self.level),
            ("message", &self.message),
            ("resourceId", &self.resource_id),
            ("traceId", &self.trace_id),
            ("spanId", &self.span_id),
            ("commit", &self.commit),
            ("metadata.parentResourceId", &parent),
        ];
        if let Some((field, _)) = text
            .iter()
            .find(|(_, value)| value.as_deref().is_some_and(|v| v.contains('\0')))
        {
            return Err(AppError::BadRequest(format!(
                "Field {field} must not contain NUL characters"
            )));
        }

        if self.timestamp.is_some_and(|ts| ts.year() < EARLIEST_YEAR) {
            return Err(AppError::BadRequest(format!(
                "timestamp must not be earlier than year {EARLIEST_YEAR}"
            )));
        }
        Ok(())
    }
}

/// Parse a request body into an event. The body must be a JSON object whose
/// known fields have the right types.
pub fn parse_event(body: &[u8]) -> Result<RawLogEvent, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::IncompleteData("Empty log event".to_string()));
    }

    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON: {e}")))?;
    if !value.is_object() {
        return Err(AppError::BadRequest(
            "Log event must be a JSON object".to_string(),
        ));
    }

    let event: RawLogEvent = serde_json::from_value(value)
        .map_err(|e| AppError::BadRequest(format!("Malformed log event: {e}")))?;
    event.check_storable()?;
    Ok(event)
}

pub async fn record(store: &dyn Store, event: RawLogEvent) -> Result<LogEntry, AppError> {
    let entry = store.insert_log(event.into_entry(Utc::now())).await?;
    tracing::debug!(log_id = %entry.id, access = entry.access, "Log event recorded");
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogFilter;
    use crate::store::{LogQuery, MemoryStore};

    #[test]
    fn defaults_are_filled() {
        let now = Utc::now();
        let entry = parse_event(br#"{"level":"info","message":"hi"}"#)
            .unwrap()
            .into_entry(now);
        assert_eq!(entry.timestamp, now);
        assert_eq!(entry.access, 3);
        assert_eq!(entry.level.as_deref(), Some("info"));
        assert!(entry.metadata.parent_resource_id.is_none());
    }

    #[test]
    fn supplied_fields_are_kept() {
        let body = br#"{
            "level": "error",
            "message": "Failed to connect to DB",
            "resourceId": "server-1234",
            "timestamp": "2023-09-15T08:00:00Z",
            "traceId": "abc-xyz-123",
            "spanId": "span-456",
            "commit": "5e5342f",
            "metadata": { "parentResourceId": "server-0987" },
            "access": 1,
            "somethingElse": [1, 2, 3]
        }"#;
        let entry = parse_event(body).unwrap().into_entry(Utc::now());
        assert_eq!(entry.resource_id.as_deref(), Some("server-1234"));
        assert_eq!(entry.timestamp.to_rfc3339(), "2023-09-15T08:00:00+00:00");
        assert_eq!(entry.commit.as_deref(), Some("5e5342f"));
        assert_eq!(
            entry.metadata.parent_resource_id.as_deref(),
            Some("server-0987")
        );
        assert_eq!(entry.access, 1);
    }

    #[test]
    fn access_is_clamped() {
        let entry = parse_event(br#"{"access": 42}"#).unwrap().into_entry(Utc::now());
        assert_eq!(entry.access, 3);
        let entry = parse_event(br#"{"access": 0}"#).unwrap().into_entry(Utc::now());
        assert_eq!(entry.access, 1);
    }

    #[test]
    fn rejects_non_objects_and_bad_shapes() {
        assert!(matches!(parse_event(b""), Err(AppError::IncompleteData(_))));
        assert!(matches!(parse_event(b"  \n"), Err(AppError::IncompleteData(_))));
        assert!(matches!(parse_event(b"[1,2]"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_event(b"not json"), Err(AppError::BadRequest(_))));
        assert!(matches!(
            parse_event(br#"{"level": 5}"#),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            parse_event(br#"{"timestamp": "yesterday"}"#),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn rejects_values_postgres_cannot_store() {
        let err = parse_event(br#"{"message": "bad\u0000byte"}"#).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("message")));

        let err = parse_event(br#"{"metadata": {"parentResourceId": "\u0000"}}"#).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("parentResourceId")));

        let err = parse_event(br#"{"timestamp": "-5000-01-01T00:00:00Z"}"#).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("timestamp")));

        assert!(parse_event(br#"{"timestamp": "0001-01-01T00:00:00Z"}"#).is_ok());
    }

    #[test]
    fn empty_object_is_accepted() {
        let entry = parse_event(b"{}").unwrap().into_entry(Utc::now());
        assert!(entry.level.is_none());
        assert_eq!(entry.access, 3);
    }

    #[tokio::test]
    async fn record_persists_entry() {
        let store = MemoryStore::new();
        let event = parse_event(br#"{"message":"stored"}"#).unwrap();
        let entry = record(&store, event).await.unwrap();

        let query = LogQuery {
            filter: LogFilter::default(),
            caller_rank: 1,
            skip: 0,
            limit: 10,
        };
        let found = store.query_logs(&query).await.unwrap();
        assert_eq!(found, vec![entry]);
    }
}
