//! Swap request status and the negotiation preconditions.
//!
//! These checks are pure: the negotiator loads the records, calls the
//! matching `check_*` function, and only then opens a unit of work. Each
//! precondition maps to a distinct [`CoreError`] variant.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::slot::SlotStatus;
use crate::types::DbId;

/// Resolution status of a swap request. Discriminants match `swap_request_statuses`.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapStatus {
    Pending = 1,
    Accepted = 2,
    Rejected = 3,
}

impl SwapStatus {
    /// Return the database status ID.
    pub fn id(self) -> i16 {
        self as i16
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SwapStatus::Pending => "PENDING",
            SwapStatus::Accepted => "ACCEPTED",
            SwapStatus::Rejected => "REJECTED",
        }
    }

    /// `Accepted` and `Rejected` never change again.
    pub fn is_terminal(self) -> bool {
        !matches!(self, SwapStatus::Pending)
    }
}

impl TryFrom<i16> for SwapStatus {
    type Error = CoreError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SwapStatus::Pending),
            2 => Ok(SwapStatus::Accepted),
            3 => Ok(SwapStatus::Rejected),
            other => Err(CoreError::Internal(format!(
                "Unknown swap request status id {other}"
            ))),
        }
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The responder's answer to a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Accept,
    Reject,
}

impl Resolution {
    pub fn from_accept(accept: bool) -> Self {
        if accept {
            Resolution::Accept
        } else {
            Resolution::Reject
        }
    }

    /// Terminal request status this resolution produces.
    pub fn request_status(self) -> SwapStatus {
        match self {
            Resolution::Accept => SwapStatus::Accepted,
            Resolution::Reject => SwapStatus::Rejected,
        }
    }

    /// Status both slots end in once the resolution commits.
    pub fn slot_status(self) -> SlotStatus {
        match self {
            Resolution::Accept => SlotStatus::Locked,
            Resolution::Reject => SlotStatus::Offered,
        }
    }
}

/// Owner and status of a slot as observed before a negotiation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotState {
    pub owner_id: DbId,
    pub status: SlotStatus,
}

/// Check the ownership and status preconditions of a proposal.
///
/// Existence is checked by the caller. Order matters: ownership of the
/// offered slot, then self-swap, then status of both sides.
pub fn check_proposal(
    requester: DbId,
    mine: SlotState,
    theirs: SlotState,
) -> Result<(), CoreError> {
    if mine.owner_id != requester {
        return Err(CoreError::Forbidden("Not your slot".into()));
    }
    if theirs.owner_id == requester {
        return Err(CoreError::InvalidRequest("Cannot swap with yourself".into()));
    }
    if mine.status != SlotStatus::Offered || theirs.status != SlotStatus::Offered {
        return Err(CoreError::InvalidState(
            "Both slots must be SWAPPABLE".into(),
        ));
    }
    Ok(())
}

/// Check that `caller` may resolve a request addressed to `responder`.
pub fn check_resolution(
    caller: DbId,
    responder: DbId,
    status: SwapStatus,
) -> Result<(), CoreError> {
    if caller != responder {
        return Err(CoreError::Forbidden("Not authorized".into()));
    }
    if status != SwapStatus::Pending {
        return Err(CoreError::InvalidState("Request is not pending".into()));
    }
    Ok(())
}

/// Check that both slots are still held by the parties recorded on the request.
pub fn check_owners_unchanged(
    requester: DbId,
    responder: DbId,
    mine: SlotState,
    theirs: SlotState,
) -> Result<(), CoreError> {
    if mine.owner_id != requester || theirs.owner_id != responder {
        return Err(CoreError::Conflict(
            "Ownership changed, cannot accept".into(),
        ));
    }
    Ok(())
}
