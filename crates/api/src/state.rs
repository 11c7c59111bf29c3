use std::sync::Arc;

use aula_history::SnapshotCoordinator;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (health checks).
    pub pool: aula_db::DbPool,
    /// Server configuration (accessed by the auth extractor).
    pub config: Arc<ServerConfig>,
    /// The snapshot coordinator and its three history ledgers.
    pub history: Arc<SnapshotCoordinator>,
}
