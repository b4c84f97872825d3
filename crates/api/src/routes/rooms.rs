//! Route definitions for room searches.

use axum::routing::get;
use axum::Router;

use crate::handlers::room;
use crate::state::AppState;

/// Routes mounted at `/rooms`.
///
/// ```text
/// GET    /available                     -> available
/// GET    /search                        -> search
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/available", get(room::available))
        .route("/search", get(room::search))
}
