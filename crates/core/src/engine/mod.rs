//! Slot availability and booking eligibility
//!
//! The engine classifies a snapshot of courts and reservations into grid
//! cells and decides whether a booking or cancellation may go ahead. It
//! never talks to the store; callers fetch the snapshot and persist the
//! outcome of an `Allow`.

mod decision;
mod grid;

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;
use uuid::Uuid;

use crate::models::{truncate_to_minute, Actor, Court, CourtId, Reservation, SlotSchedule};
use crate::permissions::{DailyQuota, QuotaTable};

pub use decision::{BookingGrant, Decision, Rejection};
pub use grid::{Cell, CellState, CourtRow, Grid};

/// Stateless rule set: a slot schedule and a quota table
#[derive(Debug, Clone, Default)]
pub struct AvailabilityEngine {
    schedule: SlotSchedule,
    quotas: QuotaTable,
}

impl AvailabilityEngine {
    pub fn new(schedule: SlotSchedule, quotas: QuotaTable) -> Self {
        Self { schedule, quotas }
    }

    pub fn schedule(&self) -> &SlotSchedule {
        &self.schedule
    }

    /// Classify every (court, slot) cell for `date`.
    ///
    /// Reservations for other dates are ignored. If several reservations
    /// claim the same cell, the viewer's own wins, otherwise the earliest
    /// created one; the cell is never `Free` in that case.
    pub fn compute_grid(
        &self,
        courts: &[Court],
        date: NaiveDate,
        reservations_for_date: &[Reservation],
        viewer_id: Option<Uuid>,
    ) -> Grid {
        let day: Vec<&Reservation> = reservations_for_date
            .iter()
            .filter(|r| r.date == date)
            .collect();

        let rows = courts
            .iter()
            .map(|court| {
                let cells = self
                    .schedule
                    .slots()
                    .iter()
                    .map(|&slot| classify(court, slot, &day, viewer_id))
                    .collect();
                CourtRow {
                    court: court.clone(),
                    cells,
                }
            })
            .collect();

        Grid {
            date,
            slots: self.schedule.slots().to_vec(),
            rows,
        }
    }

    /// Decide whether `actor` may book the cell.
    ///
    /// `existing_for_actor_on_date` is the actor's own reservations on
    /// `date`; entries for other users or dates are not counted.
    pub fn authorize_booking(
        &self,
        actor: Option<&Actor>,
        court_id: CourtId,
        date: NaiveDate,
        start_time: NaiveTime,
        existing_for_actor_on_date: &[Reservation],
        cell_state: CellState,
    ) -> Decision<BookingGrant> {
        let Some(actor) = actor else {
            return Decision::Reject(Rejection::Unauthenticated);
        };

        match cell_state {
            CellState::Free => {}
            CellState::OwnedBySelf => return Decision::Reject(Rejection::AlreadyOwnedBySelf),
            CellState::OwnedByOther | CellState::Unavailable => {
                return Decision::Reject(Rejection::SlotUnavailable)
            }
        }

        let start_time = truncate_to_minute(start_time);
        let Some(end_time) = self
            .schedule
            .end_of(start_time)
            .filter(|_| self.schedule.contains(start_time))
        else {
            debug!(%start_time, "Start time is not on the schedule");
            return Decision::Reject(Rejection::SlotUnavailable);
        };

        let held = existing_for_actor_on_date
            .iter()
            .filter(|r| r.user_id == actor.id && r.date == date)
            .count();

        match self.quotas.limit_for(actor.role) {
            DailyQuota::Denied => return Decision::Reject(Rejection::RoleNotPermitted),
            quota @ DailyQuota::Limited(limit) if quota.is_exhausted(held) => {
                debug!(user_id = %actor.id, held, limit, "Daily quota reached");
                return Decision::Reject(Rejection::QuotaExceeded { limit });
            }
            DailyQuota::Limited(_) | DailyQuota::Unbounded => {}
        }

        Decision::Allow(BookingGrant {
            court_id,
            user_id: actor.id,
            date,
            start_time,
            end_time,
        })
    }

    /// Owners and administrators may cancel
    pub fn authorize_cancellation(
        &self,
        actor: Option<&Actor>,
        reservation: &Reservation,
    ) -> Decision<()> {
        match actor {
            None => Decision::Reject(Rejection::Unauthenticated),
            Some(actor) if actor.role.is_admin() || reservation.is_owned_by(actor.id) => {
                Decision::Allow(())
            }
            Some(_) => Decision::Reject(Rejection::NotOwner),
        }
    }
}

fn classify(court: &Court, slot: NaiveTime, day: &[&Reservation], viewer_id: Option<Uuid>) -> Cell {
    if !court.active {
        return Cell {
            slot,
            state: CellState::Unavailable,
            reservation_id: None,
        };
    }

    let matches: Vec<&Reservation> = day
        .iter()
        .copied()
        .filter(|r| r.occupies(court.id, slot))
        .collect();

    if matches.len() > 1 {
        debug!(
            court_id = court.id,
            slot = %slot,
            count = matches.len(),
            "Multiple reservations claim one cell"
        );
    }

    let own = viewer_id.and_then(|viewer| matches.iter().copied().find(|r| r.is_owned_by(viewer)));
    let chosen = own.or_else(|| {
        matches
            .iter()
            .copied()
            .min_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
    });

    match chosen {
        None => Cell {
            slot,
            state: CellState::Free,
            reservation_id: None,
        },
        Some(r) => {
            let state = match viewer_id {
                Some(viewer) if r.is_owned_by(viewer) => CellState::OwnedBySelf,
                _ => CellState::OwnedByOther,
            };
            Cell {
                slot,
                state,
                reservation_id: Some(r.id),
            }
        }
    }
}
