use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_resource_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: Uuid,
    pub level: Option<String>,
    pub message: Option<String>,
    pub resource_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub trace_id: Option<String>,
    pub span_id: Option<String>,
    pub commit: Option<String>,
    pub metadata: LogMetadata,
    pub access: i16,
    /// Insertion order, used to break timestamp ties.
    #[serde(skip)]
    pub seq: i64,
}

/// A validated event ready to be written. Fields are fixed from here on.
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub level: Option<String>,
    pub message: Option<String>,
    pub resource_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub trace_id: Option<String>,
    pub span_id: Option<String>,
    pub commit: Option<String>,
    pub metadata: LogMetadata,
    pub access: i16,
}

/// Structural match against entry fields. Absent fields match anything.
///
/// There is no `access` field. Visibility comes from the caller's role, and
/// an `access` key in a request body is dropped during parsing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    pub level: Option<String>,
    pub message: Option<String>,
    pub resource_id: Option<String>,
    pub trace_id: Option<String>,
    pub span_id: Option<String>,
    pub commit: Option<String>,
    pub metadata: Option<LogMetadata>,
    /// Inclusive lower bound on `timestamp`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `timestamp`.
    pub to: Option<DateTime<Utc>>,
}

impl LogFilter {
    pub fn parent_resource_id(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.parent_resource_id.as_deref())
    }

    pub fn matches(&self, entry: &LogEntry) -> bool {
        fn field(want: &Option<String>, have: &Option<String>) -> bool {
            want.as_ref().is_none_or(|w| have.as_ref() == Some(w))
        }

        field(&self.level, &entry.level)
            && field(&self.message, &entry.message)
            && field(&self.resource_id, &entry.resource_id)
            && field(&self.trace_id, &entry.trace_id)
            && field(&self.span_id, &entry.span_id)
            && field(&self.commit, &entry.commit)
            && self
                .parent_resource_id()
                .is_none_or(|p| entry.metadata.parent_resource_id.as_deref() == Some(p))
            && self.from.is_none_or(|from| entry.timestamp >= from)
            && self.to.is_none_or(|to| entry.timestamp <= to)
    }
}
