use std::sync::Arc;

use costumier_pipeline::JobProcessor;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: costumier_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The generation pipeline, used directly by the sync route.
    pub processor: Arc<JobProcessor>,
}
