use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{LogEntry, LogMetadata, NewLogEntry};
use crate::store::LogQuery;

#[derive(Debug, sqlx::FromRow)]
pub struct LogRow {
    pub seq: i64,
    pub id: Uuid,
    pub level: Option<String>,
    pub message: Option<String>,
    pub resource_id: Option<String>,
    pub trace_id: Option<String>,
    pub span_id: Option<String>,
    pub commit_ref: Option<String>,
    pub parent_resource_id: Option<String>,
    pub logged_at: DateTime<Utc>,
    pub access: i16,
}

impl From<LogRow> for LogEntry {
    fn from(row: LogRow) -> Self {
        LogEntry {
            id: row.id,
            level: row.level,
            message: row.message,
            resource_id: row.resource_id,
            timestamp: row.logged_at,
            trace_id: row.trace_id,
            span_id: row.span_id,
            commit: row.commit_ref,
            metadata: LogMetadata {
                parent_resource_id: row.parent_resource_id,
            },
            access: row.access,
            seq: row.seq,
        }
    }
}

pub async fn insert(pool: &PgPool, id: Uuid, entry: &NewLogEntry) -> Result<LogRow, sqlx::Error> {
    sqlx::query_as::<_, LogRow>(
        "INSERT INTO logs (id, level, message, resource_id, trace_id, span_id, commit_ref,
                           parent_resource_id, logged_at, access)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
    )
    .bind(id)
    .bind(&entry.level)
    .bind(&entry.message)
    .bind(&entry.resource_id)
    .bind(&entry.trace_id)
    .bind(&entry.span_id)
    .bind(&entry.commit)
    .bind(&entry.metadata.parent_resource_id)
    .bind(entry.timestamp)
    .bind(entry.access)
    .fetch_one(pool)
    .await
}

pub async fn query(pool: &PgPool, query: &LogQuery) -> Result<Vec<LogRow>, sqlx::Error> {
    let filter = &query.filter;
    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM logs WHERE access >= ");
    qb.push_bind(query.caller_rank);

    let columns = [
        ("level", &filter.level),
        ("message", &filter.message),
        ("resource_id", &filter.resource_id),
        ("trace_id", &filter.trace_id),
        ("span_id", &filter.span_id),
        ("commit_ref", &filter.commit),
    ];
    for (column, value) in columns {
        if let Some(value) = value {
            qb.push(" AND ").push(column).push(" = ").push_bind(value.clone());
        }
    }
    if let Some(parent) = filter.parent_resource_id() {
        qb.push(" AND parent_resource_id = ")
            .push_bind(parent.to_string());
    }
    if let Some(from) = filter.from {
        qb.push(" AND logged_at >= ").push_bind(from);
    }
    if let Some(to) = filter.to {
        qb.push(" AND logged_at <= ").push_bind(to);
    }

    qb.push(" ORDER BY logged_at ASC, seq ASC LIMIT ")
        .push_bind(query.limit)
        .push(" OFFSET ")
        .push_bind(query.skip);

    qb.build_query_as::<LogRow>().fetch_all(pool).await
}
