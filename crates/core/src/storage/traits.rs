//! Storage repository traits
//!
//! These traits define the store interface the booking service talks to,
//! allowing for different implementations (SQLite, mock, hosted backend).
//! Writes take the acting user and are subject to row-level policies;
//! policy violations surface as [`crate::Error::Forbidden`], uniqueness
//! violations as [`crate::Error::Conflict`].

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Actor, Court, CourtId, Profile, Reservation, ReservationDetails, Role};

/// Court repository operations
pub trait CourtRepository {
    /// Active courts, in id order
    fn list_active_courts(&self) -> Result<Vec<Court>>;

    /// Every court, in name order
    fn list_all_courts(&self) -> Result<Vec<Court>>;

    /// Find court by ID
    fn find_court_by_id(&self, id: CourtId) -> Result<Option<Court>>;

    /// Create a new active court
    fn create_court(&self, actor: &Actor, name: &str) -> Result<Court>;

    /// Rename a court
    fn rename_court(&self, actor: &Actor, id: CourtId, name: &str) -> Result<()>;

    /// Activate or deactivate a court
    fn set_court_active(&self, actor: &Actor, id: CourtId, active: bool) -> Result<()>;

    /// Delete a court that has no reservations
    fn delete_court(&self, actor: &Actor, id: CourtId) -> Result<()>;
}

/// Reservation repository operations
pub trait ReservationRepository {
    /// All reservations on a date
    fn list_reservations_for_date(&self, date: NaiveDate) -> Result<Vec<Reservation>>;

    /// One user's reservations on a date
    fn list_reservations_for_user_on_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>>;

    /// A user's reservations from a date onward, with names
    fn list_upcoming_for_user(&self, user_id: Uuid, from: NaiveDate) -> Result<Vec<ReservationDetails>>;

    /// Every reservation with names (administrators only)
    fn list_all_reservations(&self, actor: &Actor) -> Result<Vec<ReservationDetails>>;

    /// Find reservation by ID
    fn find_reservation_by_id(&self, id: Uuid) -> Result<Option<Reservation>>;

    /// Insert a reservation
    fn insert_reservation(&self, actor: &Actor, reservation: &Reservation) -> Result<()>;

    /// Delete a reservation
    fn delete_reservation(&self, actor: &Actor, id: Uuid) -> Result<()>;
}

/// Profile repository operations
pub trait ProfileRepository {
    /// Create a new profile
    fn create_profile(&self, profile: &Profile) -> Result<()>;

    /// Find profile by ID
    fn find_profile_by_id(&self, id: Uuid) -> Result<Option<Profile>>;

    /// List every profile (administrators only)
    fn list_profiles(&self, actor: &Actor) -> Result<Vec<Profile>>;

    /// Change a profile's role (administrators only)
    fn update_profile_role(&self, actor: &Actor, id: Uuid, role: Role) -> Result<()>;

    /// Change a profile's display name
    fn update_profile_name(&self, actor: &Actor, id: Uuid, name: &str) -> Result<()>;
}

/// Combined storage interface
///
/// Provides access to all repository operations.
/// Implementations may be backed by SQLite, mocks, or network.
pub trait Storage: CourtRepository + ReservationRepository + ProfileRepository {}

// Blanket implementation: any type implementing all traits implements Storage
impl<T> Storage for T where T: CourtRepository + ReservationRepository + ProfileRepository {}
