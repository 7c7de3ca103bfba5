//! Status enums and lifecycle state machines.
//!
//! Every enum is stored as lowercase `TEXT` guarded by a check constraint in
//! the migrations, so `as_str` and `FromStr` must stay in sync with them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

fn unknown(label: &str, value: &str) -> CoreError {
    CoreError::Validation(format!("Unknown {label}: '{value}'"))
}

// ---------------------------------------------------------------------------
// User status
// ---------------------------------------------------------------------------

/// Whether an account may sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Banned,
}

impl UserStatus {
    pub const ALL: &'static [UserStatus] = &[Self::Active, Self::Banned];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Banned => "banned",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "banned" => Ok(Self::Banned),
            other => Err(unknown("user status", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Group role
// ---------------------------------------------------------------------------

/// A member's role inside one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupRole {
    Leader,
    Member,
}

impl GroupRole {
    pub const ALL: &'static [GroupRole] = &[Self::Leader, Self::Member];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Leader => "leader",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for GroupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "leader" => Ok(Self::Leader),
            "member" => Ok(Self::Member),
            other => Err(unknown("group role", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Event status
// ---------------------------------------------------------------------------

/// Lifecycle of a group event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Planned,
    Confirmed,
    Cancelled,
    Completed,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(Self::Planned),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(unknown("event status", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Booking status
// ---------------------------------------------------------------------------

/// Lifecycle of a venue booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
    Completed,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(unknown("booking status", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

impl EventStatus {
    pub const ALL: &'static [EventStatus] = &[
        Self::Planned,
        Self::Confirmed,
        Self::Cancelled,
        Self::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Statuses reachable from `self`. Terminal statuses return an empty slice.
    pub fn valid_transitions(&self) -> &'static [EventStatus] {
        use EventStatus::*;
        match self {
            Planned => &[Confirmed, Cancelled],
            Confirmed => &[Completed, Cancelled, Planned],
            Cancelled | Completed => &[],
        }
    }

    pub fn can_transition(&self, to: EventStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// Whether bookings may still be placed against an event in this status.
    pub fn accepts_bookings(&self) -> bool {
        matches!(self, EventStatus::Planned | EventStatus::Confirmed)
    }
}

impl BookingStatus {
    pub const ALL: &'static [BookingStatus] = &[
        Self::Pending,
        Self::Accepted,
        Self::Rejected,
        Self::Cancelled,
        Self::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Statuses reachable from `self`. Terminal statuses return an empty slice.
    pub fn valid_transitions(&self) -> &'static [BookingStatus] {
        use BookingStatus::*;
        match self {
            Pending => &[Accepted, Rejected, Cancelled],
            Accepted => &[Cancelled, Completed],
            Rejected | Cancelled | Completed => &[],
        }
    }

    pub fn can_transition(&self, to: BookingStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    pub fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

/// Validate an event status change, returning `Conflict` when not allowed.
///
/// Setting the current status again is a no-op and always allowed.
pub fn validate_event_transition(from: EventStatus, to: EventStatus) -> Result<(), CoreError> {
    if from == to || from.can_transition(to) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Invalid event transition: {from} -> {to}"
        )))
    }
}

/// Validate a booking status change, returning `Conflict` when not allowed.
pub fn validate_booking_transition(
    from: BookingStatus,
    to: BookingStatus,
) -> Result<(), CoreError> {
    if from.can_transition(to) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Invalid booking transition: {from} -> {to}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn text_round_trip() {
        for status in BookingStatus::ALL {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), *status);
        }
        for status in EventStatus::ALL {
            assert_eq!(status.to_string().parse::<EventStatus>().unwrap(), *status);
        }
        for role in GroupRole::ALL {
            assert_eq!(role.as_str().parse::<GroupRole>().unwrap(), *role);
        }
        for status in UserStatus::ALL {
            assert_eq!(status.as_str().parse::<UserStatus>().unwrap(), *status);
        }
    }

    #[test]
    fn unknown_text_is_a_validation_error() {
        assert_matches!("Pending".parse::<BookingStatus>(), Err(CoreError::Validation(_)));
        assert_matches!("owner".parse::<GroupRole>(), Err(CoreError::Validation(_)));
    }

    // -- bookings ------------------------------------------------------------

    #[test]
    fn pending_booking_can_be_decided_or_cancelled() {
        use BookingStatus::*;
        assert!(Pending.can_transition(Accepted));
        assert!(Pending.can_transition(Rejected));
        assert!(Pending.can_transition(Cancelled));
        assert!(!Pending.can_transition(Completed));
    }

    #[test]
    fn accepted_booking_can_complete_or_cancel() {
        use BookingStatus::*;
        assert!(Accepted.can_transition(Completed));
        assert!(Accepted.can_transition(Cancelled));
        assert!(!Accepted.can_transition(Rejected));
    }

    #[test]
    fn terminal_bookings_do_not_move() {
        use BookingStatus::*;
        for terminal in [Rejected, Cancelled, Completed] {
            assert!(terminal.is_terminal());
            for to in BookingStatus::ALL {
                assert!(!terminal.can_transition(*to));
            }
        }
    }

    #[test]
    fn invalid_booking_transition_is_conflict() {
        let err = validate_booking_transition(BookingStatus::Rejected, BookingStatus::Accepted)
            .unwrap_err();
        assert_matches!(err, CoreError::Conflict(msg) if msg.contains("rejected -> accepted"));
    }

    // -- events --------------------------------------------------------------

    #[test]
    fn event_transitions() {
        use EventStatus::*;
        assert!(Planned.can_transition(Confirmed));
        assert!(Confirmed.can_transition(Planned));
        assert!(Confirmed.can_transition(Completed));
        assert!(!Planned.can_transition(Completed));
        assert!(!Cancelled.can_transition(Planned));
    }

    #[test]
    fn same_event_status_is_allowed() {
        assert!(validate_event_transition(EventStatus::Completed, EventStatus::Completed).is_ok());
        assert_matches!(
            validate_event_transition(EventStatus::Completed, EventStatus::Planned),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn only_open_events_accept_bookings() {
        assert!(EventStatus::Planned.accepts_bookings());
        assert!(EventStatus::Confirmed.accepts_bookings());
        assert!(!EventStatus::Cancelled.accepts_bookings());
        assert!(!EventStatus::Completed.accepts_bookings());
    }
}
