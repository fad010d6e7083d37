//! Booking service
//!
//! Glues the identity provider, the store and the availability engine:
//! fetch a fresh snapshot, ask the engine, and only then perform a single
//! store write. A lost race (the store's uniqueness guard firing) is
//! reported as [`BookingOutcome::Conflict`] so the caller can re-fetch and
//! re-render; it is never retried here.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::engine::{AvailabilityEngine, CellState, Decision, Grid, Rejection};
use crate::error::{Error, Result};
use crate::identity::IdentityProvider;
use crate::invariants;
use crate::models::{CourtId, Reservation, ReservationDetails};
use crate::storage::Storage;

/// Result of a booking attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BookingOutcome {
    Booked { reservation: Reservation },
    Rejected { rejection: Rejection },
    /// Someone else took the cell between snapshot and insert
    Conflict,
}

/// Result of a cancellation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CancellationOutcome {
    Cancelled { reservation: Reservation },
    Rejected { rejection: Rejection },
    /// Already gone
    NotFound,
}

pub struct BookingService<'a, S: Storage + ?Sized, I: IdentityProvider + ?Sized> {
    store: &'a S,
    identity: &'a I,
    engine: AvailabilityEngine,
}

impl<'a, S: Storage + ?Sized, I: IdentityProvider + ?Sized> BookingService<'a, S, I> {
    pub fn new(store: &'a S, identity: &'a I, engine: AvailabilityEngine) -> Self {
        Self {
            store,
            identity,
            engine,
        }
    }

    /// Grid of active courts for `date`, as seen by the current viewer
    #[instrument(skip(self))]
    pub fn grid(&self, date: NaiveDate) -> Result<Grid> {
        let courts = self.store.list_active_courts()?;
        self.grid_for(&courts, date)
    }

    /// Grid including closed courts, whose cells are all unavailable
    #[instrument(skip(self))]
    pub fn grid_including_closed(&self, date: NaiveDate) -> Result<Grid> {
        let mut courts = self.store.list_all_courts()?;
        courts.sort_by_key(|c| c.id);
        self.grid_for(&courts, date)
    }

    fn grid_for(&self, courts: &[crate::models::Court], date: NaiveDate) -> Result<Grid> {
        let viewer = self.identity.current_actor()?.map(|a| a.id);
        let reservations = self.store.list_reservations_for_date(date)?;
        let grid = self.engine.compute_grid(courts, date, &reservations, viewer);
        invariants::assert_grid_invariants(&grid);
        Ok(grid)
    }

    /// Try to book one slot on one court for the current actor
    #[instrument(skip(self))]
    pub fn book(&self, court_id: CourtId, date: NaiveDate, start_time: NaiveTime) -> Result<BookingOutcome> {
        let Some(actor) = self.identity.current_actor()? else {
            return Ok(BookingOutcome::Rejected {
                rejection: Rejection::Unauthenticated,
            });
        };

        // Unknown courts are treated like closed ones
        let cell_state = match self.store.find_court_by_id(court_id)? {
            Some(court) => {
                let reservations = self.store.list_reservations_for_date(date)?;
                self.engine
                    .compute_grid(&[court], date, &reservations, Some(actor.id))
                    .state(court_id, start_time)
                    .unwrap_or(CellState::Unavailable)
            }
            None => CellState::Unavailable,
        };

        let existing = self
            .store
            .list_reservations_for_user_on_date(actor.id, date)?;

        let grant = match self.engine.authorize_booking(
            Some(&actor),
            court_id,
            date,
            start_time,
            &existing,
            cell_state,
        ) {
            Decision::Allow(grant) => grant,
            Decision::Reject(rejection) => {
                info!(user_id = %actor.id, %rejection, "Booking rejected");
                return Ok(BookingOutcome::Rejected { rejection });
            }
        };

        let reservation = grant.into_reservation();
        invariants::assert_reservation_invariants(&reservation, self.engine.schedule());

        match self.store.insert_reservation(&actor, &reservation) {
            Ok(()) => {
                info!(user_id = %actor.id, %grant, "Court booked");
                Ok(BookingOutcome::Booked { reservation })
            }
            Err(Error::Conflict(reason)) => {
                warn!(user_id = %actor.id, %grant, %reason, "Lost booking race");
                Ok(BookingOutcome::Conflict)
            }
            Err(e) => Err(e),
        }
    }

    /// Cancel a reservation held by the current actor (or any, for administrators)
    #[instrument(skip(self))]
    pub fn cancel(&self, reservation_id: Uuid) -> Result<CancellationOutcome> {
        let actor = self.identity.current_actor()?;

        let Some(reservation) = self.store.find_reservation_by_id(reservation_id)? else {
            return Ok(CancellationOutcome::NotFound);
        };

        match self.engine.authorize_cancellation(actor.as_ref(), &reservation) {
            Decision::Allow(()) => {}
            Decision::Reject(rejection) => {
                return Ok(CancellationOutcome::Rejected { rejection });
            }
        }

        let Some(actor) = actor else {
            return Ok(CancellationOutcome::Rejected {
                rejection: Rejection::Unauthenticated,
            });
        };

        match self.store.delete_reservation(&actor, reservation_id) {
            Ok(()) => {
                info!(user_id = %actor.id, %reservation_id, "Reservation cancelled");
                Ok(CancellationOutcome::Cancelled { reservation })
            }
            Err(Error::NotFound(_)) => Ok(CancellationOutcome::NotFound),
            Err(e) => Err(e),
        }
    }

    /// The current actor's reservations from `from` onward
    pub fn my_reservations(&self, from: NaiveDate) -> Result<Vec<ReservationDetails>> {
        match self.identity.current_actor()? {
            Some(actor) => {
                invariants::assert_user_id_valid(actor.id, "my_reservations");
                self.store.list_upcoming_for_user(actor.id, from)
            }
            None => Ok(Vec::new()),
        }
    }
}
