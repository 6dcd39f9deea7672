//! Route definitions for the generation pipeline.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// Fast generation routes, mounted under `/api/v1`.
///
/// ```text
/// POST /generate
/// GET  /status/{id}
/// GET  /styles
/// GET  /costumes
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generation::create_generation))
        .route("/status/{id}", get(generation::get_status))
        .route("/styles", get(generation::list_styles))
        .route("/costumes", get(generation::list_costumes))
}

/// The sync generation route, mounted under `/api/v1` but outside the
/// request-timeout layer: it blocks for the whole pipeline and is
/// bounded by the pipeline deadline instead.
///
/// ```text
/// POST /generate/sync
/// ```
pub fn sync_router() -> Router<AppState> {
    Router::new().route("/generate/sync", post(generation::generate_sync))
}
