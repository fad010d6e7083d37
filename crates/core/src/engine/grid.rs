//! Availability grid for one date

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{truncate_to_minute, Court, CourtId};

/// State of one (court, slot) cell. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    Free,
    OwnedBySelf,
    OwnedByOther,
    /// The court is inactive
    Unavailable,
}

impl CellState {
    pub fn label(&self) -> &'static str {
        match self {
            CellState::Free => "Free",
            CellState::OwnedBySelf => "Yours",
            CellState::OwnedByOther => "Taken",
            CellState::Unavailable => "Closed",
        }
    }
}

/// One cell of the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub slot: NaiveTime,
    pub state: CellState,
    /// The reservation the state was derived from, if any
    pub reservation_id: Option<Uuid>,
}

/// All slots of one court
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtRow {
    pub court: Court,
    pub cells: Vec<Cell>,
}

/// Per-court, per-slot states for a single date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    pub date: NaiveDate,
    pub slots: Vec<NaiveTime>,
    pub rows: Vec<CourtRow>,
}

impl Grid {
    pub fn row(&self, court_id: CourtId) -> Option<&CourtRow> {
        self.rows.iter().find(|row| row.court.id == court_id)
    }

    pub fn cell(&self, court_id: CourtId, slot: NaiveTime) -> Option<&Cell> {
        let slot = truncate_to_minute(slot);
        self.row(court_id)?.cells.iter().find(|cell| cell.slot == slot)
    }

    /// State of a cell; `None` for an unknown court or off-schedule time
    pub fn state(&self, court_id: CourtId, slot: NaiveTime) -> Option<CellState> {
        self.cell(court_id, slot).map(|cell| cell.state)
    }

    /// Iterate every cell with its court id
    pub fn cells(&self) -> impl Iterator<Item = (CourtId, &Cell)> {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter().map(move |cell| (row.court.id, cell)))
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells().filter(|(_, cell)| cell.state == state).count()
    }
}
