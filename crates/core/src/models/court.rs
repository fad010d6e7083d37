//! Court model

use serde::{Deserialize, Serialize};

/// Store-assigned court identifier
pub type CourtId = i64;

/// A bookable court
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Court {
    pub id: CourtId,
    pub name: String,
    /// Inactive courts are shown but never bookable
    pub active: bool,
}

impl Court {
    pub fn new(id: CourtId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}
