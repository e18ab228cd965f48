pub mod auth;
pub mod health;
pub mod notification;
pub mod slots;
pub mod swaps;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/signup                        signup (public)
/// /auth/login                         login (public)
/// /auth/me                            current user
///
/// /slots                              create
/// /slots/mine                         list own slots
/// /slots/{id}                         update, delete
/// /slots/{id}/status                  toggle BUSY / SWAPPABLE
/// /swappable-slots                    slots offered by others
///
/// /swap-requests                      propose, list incoming/outgoing
/// /swap-requests/{id}/response        accept or reject
///
/// /notifications                      list
/// /notifications/read-all             mark all read
/// /notifications/unread-count         unread count
/// /notifications/{id}/read            mark one read
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/slots", slots::router())
        .route("/swappable-slots", get(handlers::slots::list_swappable))
        .nest("/swap-requests", swaps::router())
        .nest("/notifications", notification::router())
}
