use std::sync::Arc;

use dci_convert::Converter;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: dci_db::DbPool,
    /// Privileged pool for reload, when `RELOAD_DATABASE_URL` is set.
    pub reload_pool: Option<dci_db::DbPool>,
    pub config: Arc<ServerConfig>,
    /// Conversion backend selected at startup.
    pub converter: Arc<dyn Converter>,
}

impl AppState {
    /// The pool reload runs on.
    pub fn reload_pool(&self) -> &dci_db::DbPool {
        self.reload_pool.as_ref().unwrap_or(&self.pool)
    }
}
