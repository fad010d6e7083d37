//! Reservation model

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slot::truncate_to_minute;
use super::CourtId;

/// One booked slot on one court. Never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub court_id: CourtId,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(
        court_id: CourtId,
        user_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            court_id,
            user_id,
            date,
            start_time: truncate_to_minute(start_time),
            end_time: truncate_to_minute(end_time),
            created_at: Utc::now(),
        }
    }

    /// Does this reservation occupy the given (court, slot) cell?
    pub fn occupies(&self, court_id: CourtId, slot: NaiveTime) -> bool {
        self.court_id == court_id && truncate_to_minute(self.start_time) == truncate_to_minute(slot)
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// A reservation joined with the names needed for listing views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationDetails {
    pub reservation: Reservation,
    pub court_name: String,
    /// `None` when the owner has no profile row
    pub user_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupies_matches_on_hour_and_minute() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let reservation = Reservation::new(
            1,
            Uuid::new_v4(),
            date,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        );

        assert!(reservation.occupies(1, NaiveTime::from_hms_opt(9, 0, 45).unwrap()));
        assert!(!reservation.occupies(2, NaiveTime::from_hms_opt(9, 0, 0).unwrap()));
        assert!(!reservation.occupies(1, NaiveTime::from_hms_opt(10, 0, 0).unwrap()));
    }
}
