//! Booking model and lifecycle state machine

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::BookingStatus;

/// Booking record. Dates are inclusive calendar days.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    pub id: i32,
    pub equipment_id: i32,
    pub requester_id: i32,
    pub owner_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: BookingStatus,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Create booking request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBooking {
    pub equipment_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Lifecycle actions on an existing booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Approve,
    Decline,
    Complete,
    Cancel,
}

/// Which party to the booking may perform an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingActor {
    Owner,
    Requester,
}

impl BookingAction {
    pub fn required_actor(self) -> BookingActor {
        match self {
            BookingAction::Approve | BookingAction::Decline | BookingAction::Complete => {
                BookingActor::Owner
            }
            BookingAction::Cancel => BookingActor::Requester,
        }
    }

    /// Resulting status of a permitted transition
    pub fn target(self) -> BookingStatus {
        match self {
            BookingAction::Approve => BookingStatus::Approved,
            BookingAction::Decline => BookingStatus::Rejected,
            BookingAction::Complete => BookingStatus::Completed,
            BookingAction::Cancel => BookingStatus::Cancelled,
        }
    }
}

impl std::fmt::Display for BookingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BookingAction::Approve => "approve",
            BookingAction::Decline => "decline",
            BookingAction::Complete => "complete",
            BookingAction::Cancel => "cancel",
        };
        write!(f, "{}", label)
    }
}

/// The booking state machine:
///
/// ```text
/// pending  --approve(owner)-->     approved
/// pending  --decline(owner)-->     rejected   [terminal]
/// pending  --cancel(requester)-->  cancelled  [terminal]
/// approved --complete(owner)-->    completed  [terminal]
/// approved --cancel(requester)-->  cancelled  [terminal]
/// ```
///
/// Returns the resulting status, or `None` when the edge does not exist
/// (including every attempt out of a terminal state).
pub fn transition(current: BookingStatus, action: BookingAction) -> Option<BookingStatus> {
    use BookingAction::*;
    use BookingStatus::*;
    if current.is_terminal() {
        return None;
    }
    let permitted = matches!(
        (current, action),
        (Pending, Approve)
            | (Pending, Decline)
            | (Pending, Cancel)
            | (Approved, Complete)
            | (Approved, Cancel)
    );
    permitted.then(|| action.target())
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingAction::*;
    use BookingStatus::*;

    const ALL_STATUSES: [BookingStatus; 5] = [Pending, Approved, Rejected, Completed, Cancelled];
    const ALL_ACTIONS: [BookingAction; 4] = [Approve, Decline, Complete, Cancel];

    #[test]
    fn defined_edges() {
        assert_eq!(transition(Pending, Approve), Some(Approved));
        assert_eq!(transition(Pending, Decline), Some(Rejected));
        assert_eq!(transition(Pending, Cancel), Some(Cancelled));
        assert_eq!(transition(Approved, Complete), Some(Completed));
        assert_eq!(transition(Approved, Cancel), Some(Cancelled));
    }

    #[test]
    fn terminal_states_are_closed() {
        for status in [Rejected, Completed, Cancelled] {
            for action in ALL_ACTIONS {
                assert_eq!(transition(status, action), None, "{status} --{action}");
            }
        }
    }

    #[test]
    fn no_approve_or_decline_out_of_approved() {
        assert_eq!(transition(Approved, Approve), None);
        assert_eq!(transition(Approved, Decline), None);
    }

    #[test]
    fn no_complete_out_of_pending() {
        assert_eq!(transition(Pending, Complete), None);
    }

    #[test]
    fn every_edge_lands_on_action_target() {
        for status in ALL_STATUSES {
            for action in ALL_ACTIONS {
                if let Some(next) = transition(status, action) {
                    assert_eq!(next, action.target());
                }
            }
        }
    }

    #[test]
    fn actor_gating() {
        assert_eq!(Approve.required_actor(), BookingActor::Owner);
        assert_eq!(Decline.required_actor(), BookingActor::Owner);
        assert_eq!(Complete.required_actor(), BookingActor::Owner);
        assert_eq!(Cancel.required_actor(), BookingActor::Requester);
    }
}
