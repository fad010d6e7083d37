//! Authorization decisions
//!
//! Rejections are ordinary values so callers can render them as messages
//! without special error paths.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{format_slot_time, CourtId, Reservation};

/// Why an authorization check said no
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    Unauthenticated,
    RoleNotPermitted,
    SlotUnavailable,
    /// The actor already holds this cell. Safe to ignore.
    AlreadyOwnedBySelf,
    QuotaExceeded { limit: u32 },
    NotOwner,
}

impl Rejection {
    /// Rejections that should not be surfaced as a failure
    pub fn is_benign(&self) -> bool {
        matches!(self, Rejection::AlreadyOwnedBySelf)
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::Unauthenticated => write!(f, "You must sign in to make a reservation"),
            Rejection::RoleNotPermitted => write!(f, "Your role is not allowed to book courts"),
            Rejection::SlotUnavailable => write!(f, "This slot is not available"),
            Rejection::AlreadyOwnedBySelf => write!(f, "You already hold this reservation"),
            Rejection::QuotaExceeded { limit } => {
                write!(f, "You can book at most {} slot(s) per day", limit)
            }
            Rejection::NotOwner => write!(f, "Only the owner or an administrator can cancel this reservation"),
        }
    }
}

/// Outcome of an authorization check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision<T> {
    Allow(T),
    Reject(Rejection),
}

impl<T> Decision<T> {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }

    pub fn allowed(&self) -> Option<&T> {
        match self {
            Decision::Allow(grant) => Some(grant),
            Decision::Reject(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Decision::Allow(_) => None,
            Decision::Reject(reason) => Some(*reason),
        }
    }
}

/// What an allowed booking should persist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingGrant {
    pub court_id: CourtId,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl BookingGrant {
    /// Materialize the reservation to hand to the store
    pub fn into_reservation(self) -> Reservation {
        Reservation::new(
            self.court_id,
            self.user_id,
            self.date,
            self.start_time,
            self.end_time,
        )
    }
}

impl std::fmt::Display for BookingGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "court {} on {} {}-{}",
            self.court_id,
            self.date,
            format_slot_time(self.start_time),
            format_slot_time(self.end_time)
        )
    }
}
