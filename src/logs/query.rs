//! Access-scoped, paginated log queries.

use serde::Deserialize;

use crate::config::PageConfig;
use crate::error::AppError;
use crate::models::{LogEntry, LogFilter, User};
use crate::store::{LogQuery, Store};

#[derive(Debug, Default, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: LogFilter,
    pub page: Option<i64>,
    pub count: Option<i64>,
}

/// One offset page. `number` starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub count: i64,
}

impl Page {
    /// Absent or non-positive values fall back to defaults; `count` is capped
    /// at the configured maximum.
    pub fn resolve(page: Option<i64>, count: Option<i64>, paging: &PageConfig) -> Self {
        let number = page.filter(|p| *p >= 1).unwrap_or(1);
        let count = count
            .filter(|c| *c >= 1)
            .unwrap_or(paging.default_count as i64)
            .min(paging.max_count as i64);
        Self { number, count }
    }

    pub fn skip(&self) -> i64 {
        self.count.saturating_mul(self.number - 1)
    }
}

/// Run `filter` for `caller`, restricted to what the caller's role may see.
pub async fn run(
    store: &dyn Store,
    caller: &User,
    filter: LogFilter,
    page: Page,
) -> Result<Vec<LogEntry>, AppError> {
    let query = LogQuery {
        filter,
        caller_rank: caller.role.rank(),
        skip: page.skip(),
        limit: page.count,
    };
    let entries = store.query_logs(&query).await?;
    tracing::debug!(
        user_id = %caller.id,
        page = page.number,
        count = page.count,
        returned = entries.len(),
        "Log query served"
    );
    Ok(entries)
}
