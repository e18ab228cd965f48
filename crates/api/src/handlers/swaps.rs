//! Handlers for the `/swap-requests` resource.
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use slotswap_core::swap::SwapStatus;
use slotswap_core::types::DbId;
use slotswap_db::models::swap_request::{ProposeSwap, RespondSwap, SwapRequest, SwapRequestLists};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Body returned by `POST /swap-requests/{id}/response`.
#[derive(Debug, Serialize)]
pub struct ResolutionResponse {
    pub status: SwapStatus,
}

/// POST /api/v1/swap-requests
///
/// Propose exchanging one of the caller's offered slots for another user's.
pub async fn propose(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ProposeSwap>,
) -> AppResult<(StatusCode, Json<SwapRequest>)> {
    let request = state
        .negotiator
        .propose(auth.user_id, input.my_slot_id, input.their_slot_id)
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// POST /api/v1/swap-requests/{id}/response
///
/// Accept or reject a pending request addressed to the caller.
pub async fn respond(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RespondSwap>,
) -> AppResult<Json<ResolutionResponse>> {
    let request = state
        .negotiator
        .resolve(auth.user_id, id, input.accept)
        .await?;
    Ok(Json(ResolutionResponse {
        status: request.status,
    }))
}

/// GET /api/v1/swap-requests
///
/// Incoming and outgoing requests with both slots attached, newest first.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<SwapRequestLists>> {
    let lists = state.negotiator.list_requests(auth.user_id).await?;
    Ok(Json(lists))
}
