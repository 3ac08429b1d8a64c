pub mod extractor;
pub mod freshness;
pub mod jwt;
pub mod password;
pub mod service;

pub use extractor::AuthUser;
pub use service::{AuthService, LoginOutcome};
