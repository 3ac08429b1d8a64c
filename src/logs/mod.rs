pub mod ingest;
pub mod query;

pub use ingest::RawLogEvent;
pub use query::{Page, QueryRequest};
