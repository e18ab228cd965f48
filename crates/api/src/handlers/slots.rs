//! Handlers for the `/slots` and `/swappable-slots` resources.
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use slotswap_core::types::DbId;
use slotswap_db::models::slot::{CreateSlot, Slot, UpdateSlot, UpdateSlotStatus};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body returned by `DELETE /slots/{id}`.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub ok: bool,
}

/// GET /api/v1/slots/mine
pub async fn list_mine(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Slot>>>> {
    let slots = state.registry.list_owned(auth.user_id).await?;
    Ok(Json(DataResponse { data: slots }))
}

/// POST /api/v1/slots
pub async fn create_slot(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSlot>,
) -> AppResult<(StatusCode, Json<Slot>)> {
    let slot = state.registry.create(auth.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

/// PUT /api/v1/slots/{id}
pub async fn update_slot(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSlot>,
) -> AppResult<Json<Slot>> {
    let slot = state.registry.update(id, auth.user_id, input).await?;
    Ok(Json(slot))
}

/// PUT /api/v1/slots/{id}/status
///
/// Toggle between `BUSY` and `SWAPPABLE`. Slots in negotiation are frozen.
pub async fn set_slot_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSlotStatus>,
) -> AppResult<Json<Slot>> {
    let slot = state
        .registry
        .set_status(id, auth.user_id, input.status)
        .await?;
    Ok(Json(slot))
}

/// DELETE /api/v1/slots/{id}
pub async fn delete_slot(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeletedResponse>> {
    state.registry.delete(id, auth.user_id).await?;
    Ok(Json(DeletedResponse { ok: true }))
}

/// GET /api/v1/swappable-slots
///
/// Slots other users currently offer, earliest first.
pub async fn list_swappable(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Slot>>>> {
    let slots = state.registry.list_offered(auth.user_id).await?;
    Ok(Json(DataResponse { data: slots }))
}
