//! Slot exchange status and the owner-facing transition rules.
//!
//! A slot is `Locked` (not offered), `Offered` (available for swap) or
//! `InNegotiation` (committed to exactly one pending swap request). The wire
//! and database names are the historical `BUSY`, `SWAPPABLE` and
//! `SWAP_PENDING`; discriminants match the seed order of `slot_statuses`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Exchange status of a calendar slot.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotStatus {
    #[serde(rename = "BUSY")]
    Locked = 1,
    #[serde(rename = "SWAPPABLE")]
    Offered = 2,
    #[serde(rename = "SWAP_PENDING")]
    InNegotiation = 3,
}

impl SlotStatus {
    /// Return the database status ID.
    pub fn id(self) -> i16 {
        self as i16
    }

    /// Wire name used in JSON payloads and the `slot_statuses` lookup table.
    pub fn as_str(self) -> &'static str {
        match self {
            SlotStatus::Locked => "BUSY",
            SlotStatus::Offered => "SWAPPABLE",
            SlotStatus::InNegotiation => "SWAP_PENDING",
        }
    }

    /// Statuses an owner may set directly.
    pub fn is_owner_settable(self) -> bool {
        matches!(self, SlotStatus::Locked | SlotStatus::Offered)
    }
}

impl TryFrom<i16> for SlotStatus {
    type Error = CoreError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SlotStatus::Locked),
            2 => Ok(SlotStatus::Offered),
            3 => Ok(SlotStatus::InNegotiation),
            other => Err(CoreError::Internal(format!("Unknown slot status id {other}"))),
        }
    }
}

impl FromStr for SlotStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUSY" => Ok(SlotStatus::Locked),
            "SWAPPABLE" => Ok(SlotStatus::Offered),
            "SWAP_PENDING" => Ok(SlotStatus::InNegotiation),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{other}'. Must be one of: BUSY, SWAPPABLE, SWAP_PENDING"
            ))),
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check an owner-initiated status change.
///
/// Owners may only toggle between `Locked` and `Offered`; a slot that is
/// `InNegotiation` belongs to the negotiator until the request resolves.
pub fn check_owner_transition(current: SlotStatus, next: SlotStatus) -> Result<(), CoreError> {
    if current == SlotStatus::InNegotiation {
        return Err(CoreError::InvalidTransition(
            "Slot is in an open swap negotiation".into(),
        ));
    }
    if !next.is_owner_settable() {
        return Err(CoreError::InvalidTransition(format!(
            "Status {next} can only be set by a swap request"
        )));
    }
    Ok(())
}

/// Check the status a slot may be created with.
pub fn check_initial_status(status: SlotStatus) -> Result<(), CoreError> {
    if status.is_owner_settable() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "A new slot cannot start as {status}"
        )))
    }
}

/// Check whether a slot in `status` may be deleted.
pub fn check_deletable(status: SlotStatus) -> Result<(), CoreError> {
    if status == SlotStatus::InNegotiation {
        return Err(CoreError::Conflict(
            "Slot is part of a pending swap request and cannot be deleted".into(),
        ));
    }
    Ok(())
}

/// Validate a slot title and time window.
pub fn validate_slot(title: &str, start: Timestamp, end: Timestamp) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if start >= end {
        return Err(CoreError::Validation(
            "start_time must be before end_time".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn status_ids_round_trip_through_lookup() {
        for status in [
            SlotStatus::Locked,
            SlotStatus::Offered,
            SlotStatus::InNegotiation,
        ] {
            assert_eq!(SlotStatus::try_from(status.id()).unwrap(), status);
            assert_eq!(status.as_str().parse::<SlotStatus>().unwrap(), status);
        }
        assert!(SlotStatus::try_from(0).is_err());
    }

    #[test]
    fn serializes_with_wire_names() {
        let json = serde_json::to_string(&SlotStatus::InNegotiation).unwrap();
        assert_eq!(json, "\"SWAP_PENDING\"");

        let parsed: SlotStatus = serde_json::from_str("\"SWAPPABLE\"").unwrap();
        assert_eq!(parsed, SlotStatus::Offered);
    }

    #[test]
    fn unknown_status_string_is_validation_error() {
        assert_matches!("FREE".parse::<SlotStatus>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn owner_can_toggle_locked_and_offered() {
        assert!(check_owner_transition(SlotStatus::Locked, SlotStatus::Offered).is_ok());
        assert!(check_owner_transition(SlotStatus::Offered, SlotStatus::Locked).is_ok());
        assert!(check_owner_transition(SlotStatus::Offered, SlotStatus::Offered).is_ok());
    }

    #[test]
    fn owner_cannot_force_negotiation() {
        assert_matches!(
            check_owner_transition(SlotStatus::Offered, SlotStatus::InNegotiation),
            Err(CoreError::InvalidTransition(_))
        );
    }

    #[test]
    fn owner_cannot_leave_negotiation() {
        assert_matches!(
            check_owner_transition(SlotStatus::InNegotiation, SlotStatus::Locked),
            Err(CoreError::InvalidTransition(_))
        );
    }

    #[test]
    fn negotiating_slot_is_not_deletable() {
        assert!(check_deletable(SlotStatus::Locked).is_ok());
        assert!(check_deletable(SlotStatus::Offered).is_ok());
        assert_matches!(
            check_deletable(SlotStatus::InNegotiation),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn new_slot_cannot_start_in_negotiation() {
        assert!(check_initial_status(SlotStatus::Offered).is_ok());
        assert_matches!(
            check_initial_status(SlotStatus::InNegotiation),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn window_must_be_ordered() {
        let start = Utc::now();
        assert!(validate_slot("Standup", start, start + Duration::hours(1)).is_ok());
        assert_matches!(
            validate_slot("Standup", start, start),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_slot("Standup", start, start - Duration::minutes(5)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn blank_title_rejected() {
        let start = Utc::now();
        assert_matches!(
            validate_slot("   ", start, start + Duration::hours(1)),
            Err(CoreError::Validation(_))
        );
    }
}
