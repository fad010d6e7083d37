//! Permission system and daily booking quotas

use serde::{Deserialize, Serialize};

use crate::models::Role;

/// Actions that can be performed in the club
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClubAction {
    // Grid
    ViewGrid,

    // Own reservations
    BookCourt,
    CancelOwnReservation,
    ViewOwnReservations,

    // Administration
    CancelAnyReservation,
    ViewAllReservations,
    ManageCourts,
    ManageUsers,
}

/// Permission matrix for club roles
pub struct PermissionMatrix;

impl PermissionMatrix {
    /// Check if a role has permission to perform an action
    pub fn can_perform(role: Role, action: ClubAction) -> bool {
        match action {
            // Anyone can look at the grid
            ClubAction::ViewGrid => true,

            // Owners can always give a slot back, even after a demotion
            ClubAction::CancelOwnReservation => true,

            // Booking - members and above
            ClubAction::BookCourt => role >= Role::Member,
            ClubAction::ViewOwnReservations => role >= Role::Member,

            // Administration - administrator only
            ClubAction::CancelAnyReservation => role == Role::Administrator,
            ClubAction::ViewAllReservations => role == Role::Administrator,
            ClubAction::ManageCourts => role == Role::Administrator,
            ClubAction::ManageUsers => role == Role::Administrator,
        }
    }
}

/// Per-date booking allowance for a role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyQuota {
    /// Not allowed to book at all
    Denied,
    /// At most this many reservations per date
    Limited(u32),
    /// No limit; never compared
    Unbounded,
}

impl DailyQuota {
    /// Would holding `held` reservations already exhaust this quota?
    pub fn is_exhausted(&self, held: usize) -> bool {
        match self {
            DailyQuota::Denied => true,
            DailyQuota::Limited(limit) => held >= *limit as usize,
            DailyQuota::Unbounded => false,
        }
    }
}

/// Role-indexed daily limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaTable {
    pub member: u32,
    pub instructor: u32,
}

impl QuotaTable {
    pub fn limit_for(&self, role: Role) -> DailyQuota {
        match role {
            Role::Administrator => DailyQuota::Unbounded,
            Role::Instructor => DailyQuota::Limited(self.instructor),
            Role::Member => DailyQuota::Limited(self.member),
            Role::Guest => DailyQuota::Denied,
        }
    }
}

impl Default for QuotaTable {
    fn default() -> Self {
        Self {
            member: 1,
            instructor: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_permissions() {
        assert!(PermissionMatrix::can_perform(Role::Guest, ClubAction::ViewGrid));
        assert!(!PermissionMatrix::can_perform(Role::Guest, ClubAction::BookCourt));
        assert!(!PermissionMatrix::can_perform(Role::Guest, ClubAction::ViewOwnReservations));
        assert!(PermissionMatrix::can_perform(Role::Guest, ClubAction::CancelOwnReservation));
    }

    #[test]
    fn test_member_and_instructor_permissions() {
        for role in [Role::Member, Role::Instructor] {
            assert!(PermissionMatrix::can_perform(role, ClubAction::BookCourt));
            assert!(PermissionMatrix::can_perform(role, ClubAction::CancelOwnReservation));
            assert!(!PermissionMatrix::can_perform(role, ClubAction::CancelAnyReservation));
            assert!(!PermissionMatrix::can_perform(role, ClubAction::ManageCourts));
        }
    }

    #[test]
    fn test_administrator_permissions() {
        assert!(PermissionMatrix::can_perform(Role::Administrator, ClubAction::ManageCourts));
        assert!(PermissionMatrix::can_perform(Role::Administrator, ClubAction::ManageUsers));
        assert!(PermissionMatrix::can_perform(Role::Administrator, ClubAction::ViewAllReservations));
    }

    #[test]
    fn test_default_quotas() {
        let quotas = QuotaTable::default();
        assert_eq!(quotas.limit_for(Role::Member), DailyQuota::Limited(1));
        assert_eq!(quotas.limit_for(Role::Instructor), DailyQuota::Limited(3));
        assert_eq!(quotas.limit_for(Role::Administrator), DailyQuota::Unbounded);
        assert_eq!(quotas.limit_for(Role::Guest), DailyQuota::Denied);
    }

    #[test]
    fn test_quota_exhaustion() {
        assert!(!DailyQuota::Limited(3).is_exhausted(2));
        assert!(DailyQuota::Limited(3).is_exhausted(3));
        assert!(!DailyQuota::Unbounded.is_exhausted(usize::MAX));
        assert!(DailyQuota::Denied.is_exhausted(0));
    }
}
