use std::sync::Arc;

use crate::auth::Auth;
use crate::config::Config;
use crate::db::Database;
use crate::store::{EmployeeStore, SessionStore, UserStore};

/// Shared application state, injected into every request as an extension.
#[derive(Clone)]
pub struct AppState {
    pub auth: Auth,
    pub employees: EmployeeStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: &Database, config: Config) -> Self {
        let users = UserStore::new(db.pool());
        let sessions = SessionStore::new(db.pool(), config.session_timeout_secs);
        Self {
            auth: Auth::new(users, sessions),
            employees: EmployeeStore::new(db.pool()),
            config: Arc::new(config),
        }
    }
}
