//! Route definitions for the `/swap-requests` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::swaps;
use crate::state::AppState;

/// Routes mounted at `/swap-requests`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> propose
/// POST   /{id}/response    -> respond
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(swaps::list).post(swaps::propose))
        .route("/{id}/response", post(swaps::respond))
}
