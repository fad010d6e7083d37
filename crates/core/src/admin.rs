//! Club administration: courts, roles and the reservation overview
//!
//! Every operation checks the permission matrix against the current actor
//! before touching the store; the store enforces the same rules again.

use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::identity::IdentityProvider;
use crate::invariants;
use crate::models::{Actor, Court, CourtId, Profile, ReservationDetails, Role};
use crate::permissions::{ClubAction, PermissionMatrix};
use crate::storage::Storage;

pub struct ClubAdmin<'a, S: Storage + ?Sized, I: IdentityProvider + ?Sized> {
    store: &'a S,
    identity: &'a I,
}

impl<'a, S: Storage + ?Sized, I: IdentityProvider + ?Sized> ClubAdmin<'a, S, I> {
    pub fn new(store: &'a S, identity: &'a I) -> Self {
        Self { store, identity }
    }

    fn require(&self, action: ClubAction) -> Result<Actor> {
        let actor = self
            .identity
            .current_actor()?
            .ok_or_else(|| Error::PermissionDenied("sign in required".to_string()))?;
        if !PermissionMatrix::can_perform(actor.role, action) {
            return Err(Error::PermissionDenied(format!(
                "{} cannot perform {:?}",
                actor.role, action
            )));
        }
        Ok(actor)
    }

    /// Every court, active or not
    pub fn courts(&self) -> Result<Vec<Court>> {
        self.require(ClubAction::ManageCourts)?;
        self.store.list_all_courts()
    }

    pub fn add_court(&self, name: &str) -> Result<Court> {
        let actor = self.require(ClubAction::ManageCourts)?;
        let court = self.store.create_court(&actor, court_name(name)?)?;
        invariants::assert_court_invariants(&court);
        Ok(court)
    }

    pub fn rename_court(&self, id: CourtId, name: &str) -> Result<()> {
        let actor = self.require(ClubAction::ManageCourts)?;
        self.store.rename_court(&actor, id, court_name(name)?)
    }

    /// Flip a court between active and inactive, returning the new state
    pub fn toggle_court(&self, id: CourtId) -> Result<Court> {
        let actor = self.require(ClubAction::ManageCourts)?;
        let mut court = self
            .store
            .find_court_by_id(id)?
            .ok_or_else(|| Error::NotFound(format!("court {}", id)))?;
        court.active = !court.active;
        self.store.set_court_active(&actor, id, court.active)?;
        Ok(court)
    }

    /// Remove a court; refused with a conflict while reservations reference it
    pub fn remove_court(&self, id: CourtId) -> Result<()> {
        let actor = self.require(ClubAction::ManageCourts)?;
        self.store.delete_court(&actor, id)?;
        info!(court_id = id, "Court removed");
        Ok(())
    }

    pub fn users(&self) -> Result<Vec<Profile>> {
        let actor = self.require(ClubAction::ManageUsers)?;
        self.store.list_profiles(&actor)
    }

    pub fn set_role(&self, user_id: Uuid, role: Role) -> Result<()> {
        let actor = self.require(ClubAction::ManageUsers)?;
        self.store.update_profile_role(&actor, user_id, role)
    }

    /// Every reservation with user and court names
    pub fn reservations(&self) -> Result<Vec<ReservationDetails>> {
        let actor = self.require(ClubAction::ViewAllReservations)?;
        self.store.list_all_reservations(&actor)
    }
}

fn court_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidOperation("court name is required".to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::SessionIdentity;
    use crate::storage::{Database, ProfileRepository};

    fn profile(db: &Database, email: &str, role: Role) -> Uuid {
        let profile = Profile::new(Uuid::new_v4(), email.to_string(), email.to_string()).with_role(role);
        db.create_profile(&profile).unwrap();
        profile.id
    }

    #[test]
    fn test_court_lifecycle() {
        let db = Database::open_in_memory().unwrap();
        let admin_id = profile(&db, "admin@club.test", Role::Administrator);
        let identity = SessionIdentity::signed_in(&db, admin_id);
        let admin = ClubAdmin::new(&db, &identity);

        let court = admin.add_court(" Central ").unwrap();
        assert_eq!(court.name, "Central");

        admin.rename_court(court.id, "Centre Court").unwrap();
        let toggled = admin.toggle_court(court.id).unwrap();
        assert!(!toggled.active);
        assert!(admin.toggle_court(court.id).unwrap().active);

        let courts = admin.courts().unwrap();
        assert_eq!(courts[0].name, "Centre Court");

        admin.remove_court(court.id).unwrap();
        assert!(admin.courts().unwrap().is_empty());
        assert!(matches!(admin.toggle_court(court.id), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_blank_court_name_rejected() {
        let db = Database::open_in_memory().unwrap();
        let admin_id = profile(&db, "admin@club.test", Role::Administrator);
        let identity = SessionIdentity::signed_in(&db, admin_id);
        let admin = ClubAdmin::new(&db, &identity);

        assert!(matches!(admin.add_court("   "), Err(Error::InvalidOperation(_))));
    }

    #[test]
    fn test_members_cannot_administer() {
        let db = Database::open_in_memory().unwrap();
        let member_id = profile(&db, "m@club.test", Role::Member);
        let identity = SessionIdentity::signed_in(&db, member_id);
        let admin = ClubAdmin::new(&db, &identity);

        assert!(matches!(admin.add_court("Court"), Err(Error::PermissionDenied(_))));
        assert!(matches!(admin.users(), Err(Error::PermissionDenied(_))));
        assert!(matches!(
            admin.set_role(member_id, Role::Administrator),
            Err(Error::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_set_role() {
        let db = Database::open_in_memory().unwrap();
        let admin_id = profile(&db, "admin@club.test", Role::Administrator);
        let member_id = profile(&db, "m@club.test", Role::Member);
        let identity = SessionIdentity::signed_in(&db, admin_id);
        let admin = ClubAdmin::new(&db, &identity);

        admin.set_role(member_id, Role::Instructor).unwrap();
        let users = admin.users().unwrap();
        let changed = users.iter().find(|p| p.id == member_id).unwrap();
        assert_eq!(changed.role, Role::Instructor);
    }
}
