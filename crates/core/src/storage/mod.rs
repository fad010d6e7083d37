//! SQLite storage layer for Courtbook

mod courts;
mod migrations;
mod parse;
mod policy;
mod profiles;
mod reservations;
mod traits;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Actor, Court, CourtId, Profile, Reservation, ReservationDetails, Role};
use crate::permissions::ClubAction;
use rusqlite::Connection;
use std::path::Path;
use tracing::{info, instrument};

pub use courts::CourtStore;
pub use profiles::ProfileStore;
pub use reservations::ReservationStore;
pub use traits::{CourtRepository, ProfileRepository, ReservationRepository, Storage};

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    /// Unchecked court store; writes bypass row-level policies
    pub(crate) fn courts(&self) -> CourtStore<'_> {
        CourtStore::new(&self.conn)
    }

    /// Unchecked reservation store; writes bypass row-level policies
    pub(crate) fn reservations(&self) -> ReservationStore<'_> {
        ReservationStore::new(&self.conn)
    }

    /// Unchecked profile store; writes bypass row-level policies
    pub(crate) fn profiles(&self) -> ProfileStore<'_> {
        ProfileStore::new(&self.conn)
    }
}

// Implement repository traits for Database
// Every write goes through the row-level policies first

impl CourtRepository for Database {
    fn list_active_courts(&self) -> Result<Vec<Court>> {
        self.courts().list_active()
    }

    fn list_all_courts(&self) -> Result<Vec<Court>> {
        self.courts().list_all()
    }

    fn find_court_by_id(&self, id: CourtId) -> Result<Option<Court>> {
        self.courts().find_by_id(id)
    }

    fn create_court(&self, actor: &Actor, name: &str) -> Result<Court> {
        policy::require(actor, ClubAction::ManageCourts)?;
        let court = self.courts().create(name)?;
        info!(court_id = court.id, name, "Court created");
        Ok(court)
    }

    fn rename_court(&self, actor: &Actor, id: CourtId, name: &str) -> Result<()> {
        policy::require(actor, ClubAction::ManageCourts)?;
        self.courts().rename(id, name)
    }

    fn set_court_active(&self, actor: &Actor, id: CourtId, active: bool) -> Result<()> {
        policy::require(actor, ClubAction::ManageCourts)?;
        self.courts().set_active(id, active)?;
        info!(court_id = id, active, "Court availability changed");
        Ok(())
    }

    fn delete_court(&self, actor: &Actor, id: CourtId) -> Result<()> {
        policy::require(actor, ClubAction::ManageCourts)?;
        self.courts().delete(id)
    }
}

impl ReservationRepository for Database {
    fn list_reservations_for_date(&self, date: NaiveDate) -> Result<Vec<Reservation>> {
        self.reservations().list_for_date(date)
    }

    fn list_reservations_for_user_on_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>> {
        self.reservations().list_for_user_on_date(user_id, date)
    }

    fn list_upcoming_for_user(&self, user_id: Uuid, from: NaiveDate) -> Result<Vec<ReservationDetails>> {
        self.reservations().list_for_user_from(user_id, from)
    }

    fn list_all_reservations(&self, actor: &Actor) -> Result<Vec<ReservationDetails>> {
        policy::require(actor, ClubAction::ViewAllReservations)?;
        self.reservations().list_all_details()
    }

    fn find_reservation_by_id(&self, id: Uuid) -> Result<Option<Reservation>> {
        self.reservations().find_by_id(id)
    }

    fn insert_reservation(&self, actor: &Actor, reservation: &Reservation) -> Result<()> {
        policy::check_reservation_insert(actor, reservation)?;
        self.reservations().insert(reservation)
    }

    fn delete_reservation(&self, actor: &Actor, id: Uuid) -> Result<()> {
        let reservation = self
            .reservations()
            .find_by_id(id)?
            .ok_or_else(|| Error::NotFound(format!("reservation {}", id)))?;
        policy::check_reservation_delete(actor, &reservation)?;
        if !self.reservations().delete(id)? {
            return Err(Error::NotFound(format!("reservation {}", id)));
        }
        Ok(())
    }
}

impl ProfileRepository for Database {
    fn create_profile(&self, profile: &Profile) -> Result<()> {
        self.profiles().create(profile)
    }

    fn find_profile_by_id(&self, id: Uuid) -> Result<Option<Profile>> {
        self.profiles().find_by_id(id)
    }

    fn list_profiles(&self, actor: &Actor) -> Result<Vec<Profile>> {
        policy::require(actor, ClubAction::ManageUsers)?;
        self.profiles().list()
    }

    fn update_profile_role(&self, actor: &Actor, id: Uuid, role: Role) -> Result<()> {
        policy::require(actor, ClubAction::ManageUsers)?;
        self.profiles().update_role(id, role)?;
        info!(profile_id = %id, role = role.as_str(), "Role changed");
        Ok(())
    }

    fn update_profile_name(&self, actor: &Actor, id: Uuid, name: &str) -> Result<()> {
        policy::check_profile_update(actor, id)?;
        self.profiles().update_name(id, name)
    }
}
