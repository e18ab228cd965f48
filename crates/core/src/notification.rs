//! Well-known notification kind constants.
//!
//! These must match the values stored in `notifications.kind` and the event
//! types published on the event bus by the swap negotiator.

/// A new swap request addressed to the recipient.
pub const KIND_SWAP_REQUEST: &str = "swap_request";

/// The recipient's outgoing request was accepted.
pub const KIND_SWAP_ACCEPTED: &str = "swap_accepted";

/// The recipient's outgoing request was rejected.
pub const KIND_SWAP_REJECTED: &str = "swap_rejected";

/// All kinds accepted by the `notifications` table check constraint.
pub const VALID_KINDS: &[&str] = &[KIND_SWAP_REQUEST, KIND_SWAP_ACCEPTED, KIND_SWAP_REJECTED];

/// Whether `kind` is a notification kind the platform produces.
pub fn is_valid_kind(kind: &str) -> bool {
    VALID_KINDS.contains(&kind)
}
