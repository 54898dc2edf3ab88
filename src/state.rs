use std::sync::Arc;

use crate::auth::AuthSettings;
use crate::repository::{AccessTokenRepository, MemoryStore, PgStore, TaskRepository, UserRepository};

/// Shared application state, registered once as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub tokens: Arc<dyn AccessTokenRepository>,
    pub auth: AuthSettings,
    /// Name of the storage backend, reported by the health check.
    pub storage: &'static str,
}

impl AppState {
    pub fn postgres(store: PgStore, auth: AuthSettings) -> Self {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            tasks: store.clone(),
            tokens: store,
            auth,
            storage: "postgres",
        }
    }

    pub fn in_memory(auth: AuthSettings) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            tasks: store.clone(),
            tokens: store,
            auth,
            storage: "memory",
        }
    }
}
