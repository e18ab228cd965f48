//! Route definitions for the `/slots` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::slots;
use crate::state::AppState;

/// Routes mounted at `/slots`.
///
/// ```text
/// POST   /              -> create_slot
/// GET    /mine          -> list_mine
/// PUT    /{id}          -> update_slot
/// DELETE /{id}          -> delete_slot
/// PUT    /{id}/status   -> set_slot_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(slots::create_slot))
        .route("/mine", get(slots::list_mine))
        .route("/{id}", put(slots::update_slot).delete(slots::delete_slot))
        .route("/{id}/status", put(slots::set_slot_status))
}
