pub mod generation;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree (fast routes only -- the sync
/// generation route is mounted separately, outside the request timeout).
///
/// ```text
/// POST /generate           submit a job
/// GET  /status/{id}        poll job status
/// GET  /styles             accepted style labels
/// GET  /costumes           costume preset catalog
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(generation::router())
}
