use std::sync::Arc;

use crate::auth::AuthService;
use crate::config::Config;
use crate::rate_limit::LoginThrottle;
use crate::store::SharedStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub store: SharedStore,
    pub config: Config,
    pub auth: AuthService,
    pub login_throttle: LoginThrottle,
}
