//! Swap request entity model and DTOs.

use serde::{Deserialize, Serialize};
use slotswap_core::swap::SwapStatus;
use slotswap_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use super::slot::Slot;

/// A row from the `swap_requests` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct SwapRequest {
    pub id: DbId,
    pub requester_id: DbId,
    /// Owner of `their_slot_id` at proposal time.
    pub responder_id: DbId,
    pub my_slot_id: DbId,
    pub their_slot_id: DbId,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: SwapStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for a new pending request.
#[derive(Debug, Clone)]
pub struct NewSwapRequest {
    pub requester_id: DbId,
    pub responder_id: DbId,
    pub my_slot_id: DbId,
    pub their_slot_id: DbId,
}

/// A request with both referenced slots resolved.
///
/// A slot is `None` when it was deleted after the request resolved.
#[derive(Debug, Clone, Serialize)]
pub struct SwapRequestDetail {
    #[serde(flatten)]
    pub request: SwapRequest,
    pub my_slot: Option<Slot>,
    pub their_slot: Option<Slot>,
}

/// Requests addressed to and sent by a user, newest first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SwapRequestLists {
    pub incoming: Vec<SwapRequestDetail>,
    pub outgoing: Vec<SwapRequestDetail>,
}

/// Request body for proposing a swap.
#[derive(Debug, Clone, Deserialize)]
pub struct ProposeSwap {
    pub my_slot_id: DbId,
    pub their_slot_id: DbId,
}

/// Request body for answering a swap request.
#[derive(Debug, Clone, Deserialize)]
pub struct RespondSwap {
    pub accept: bool,
}
