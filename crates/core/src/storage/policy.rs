//! Row-level write policies
//!
//! The store refuses writes that the acting user is not entitled to make,
//! independently of any check the caller already performed.

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{Actor, Reservation};
use crate::permissions::{ClubAction, PermissionMatrix};

/// Reservations may only be inserted for oneself, except by administrators
pub fn check_reservation_insert(actor: &Actor, reservation: &Reservation) -> Result<()> {
    if !PermissionMatrix::can_perform(actor.role, ClubAction::BookCourt) {
        return Err(Error::Forbidden(format!(
            "role {} cannot insert reservations",
            actor.role.as_str()
        )));
    }
    if reservation.user_id != actor.id && !actor.role.is_admin() {
        return Err(Error::Forbidden(
            "reservation must belong to the acting user".to_string(),
        ));
    }
    Ok(())
}

/// Reservations may be deleted by their owner or an administrator
pub fn check_reservation_delete(actor: &Actor, reservation: &Reservation) -> Result<()> {
    let allowed = if reservation.user_id == actor.id {
        PermissionMatrix::can_perform(actor.role, ClubAction::CancelOwnReservation)
    } else {
        PermissionMatrix::can_perform(actor.role, ClubAction::CancelAnyReservation)
    };
    if !allowed {
        return Err(Error::Forbidden(format!(
            "reservation {} does not belong to the acting user",
            reservation.id
        )));
    }
    Ok(())
}

/// Profiles may be renamed by their owner or an administrator
pub fn check_profile_update(actor: &Actor, profile_id: Uuid) -> Result<()> {
    if actor.id != profile_id && !PermissionMatrix::can_perform(actor.role, ClubAction::ManageUsers) {
        return Err(Error::Forbidden("cannot edit another profile".to_string()));
    }
    Ok(())
}

/// Administrative writes and reads
pub fn require(actor: &Actor, action: ClubAction) -> Result<()> {
    if !PermissionMatrix::can_perform(actor.role, action) {
        return Err(Error::Forbidden(format!(
            "role {} cannot perform {:?}",
            actor.role.as_str(),
            action
        )));
    }
    Ok(())
}
