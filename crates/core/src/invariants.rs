//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use uuid::Uuid;

use crate::engine::{CellState, Grid};
use crate::models::{Court, Reservation, SlotSchedule};

/// Validate that a court is well formed
pub fn assert_court_invariants(court: &Court) {
    debug_assert!(
        !court.name.trim().is_empty(),
        "Court {} has empty name",
        court.id
    );
}

/// Validate that a reservation spans exactly one slot of the schedule
pub fn assert_reservation_invariants(reservation: &Reservation, schedule: &SlotSchedule) {
    debug_assert!(
        reservation.user_id != Uuid::nil(),
        "Reservation {} has nil user_id",
        reservation.id
    );

    debug_assert!(
        reservation.start_time < reservation.end_time,
        "Reservation {} ends at {} before it starts at {}",
        reservation.id,
        reservation.end_time,
        reservation.start_time
    );

    debug_assert!(
        schedule.end_of(reservation.start_time) == Some(reservation.end_time),
        "Reservation {} does not span exactly one slot",
        reservation.id
    );
}

/// Validate that a grid has one cell per slot per court
pub fn assert_grid_invariants(grid: &Grid) {
    for row in &grid.rows {
        debug_assert!(
            row.cells.len() == grid.slots.len(),
            "Court {} has {} cells for {} slots",
            row.court.id,
            row.cells.len(),
            grid.slots.len()
        );

        for (cell, slot) in row.cells.iter().zip(&grid.slots) {
            debug_assert!(
                cell.slot == *slot,
                "Court {} cell {} out of slot order",
                row.court.id,
                cell.slot
            );
        }

        // Inactive courts are closed across the board
        if !row.court.active {
            debug_assert!(
                row.cells.iter().all(|c| c.state == CellState::Unavailable),
                "Inactive court {} has bookable cells",
                row.court.id
            );
        }
    }
}

/// Validate that a user ID is not nil
pub fn assert_user_id_valid(user_id: Uuid, context: &str) {
    debug_assert!(
        user_id != Uuid::nil(),
        "Nil user_id in context: {}",
        context
    );
}
