use std::sync::Arc;

use dormex_db::DbPool;
use dormex_notify::Notifier;

use crate::config::ServerConfig;

/// Shared application state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Postgres connection pool.
    pub pool: DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Best-effort email notifier.
    pub notifier: Arc<Notifier>,
}
