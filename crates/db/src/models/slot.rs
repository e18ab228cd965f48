//! Slot entity model and DTOs.

use serde::{Deserialize, Serialize};
use slotswap_core::slot::SlotStatus;
use slotswap_core::swap::SlotState;
use slotswap_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `slots` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Slot {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: SlotStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Slot {
    /// Owner and status as seen by the negotiation preconditions.
    pub fn state(&self) -> SlotState {
        SlotState {
            owner_id: self.owner_id,
            status: self.status,
        }
    }
}

/// DTO for creating a slot. `status` defaults to `BUSY`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSlot {
    pub title: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub status: Option<SlotStatus>,
}

/// DTO for editing a slot's descriptive fields. All fields are optional.
///
/// Ownership and status are deliberately absent: status changes go through
/// [`UpdateSlotStatus`] and ownership only moves by accepting a swap.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSlot {
    pub title: Option<String>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
}

/// DTO for an owner toggling a slot between `BUSY` and `SWAPPABLE`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSlotStatus {
    pub status: SlotStatus,
}
