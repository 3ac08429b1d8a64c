pub mod log_entry;
pub mod user;

pub use log_entry::{LogEntry, LogFilter, LogMetadata, NewLogEntry};
pub use user::{NewUser, PublicUser, User};
