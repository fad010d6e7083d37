//! Profile, role and actor models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Club roles in privilege order (highest to lowest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Role {
    /// Full control over courts, users and every reservation
    Administrator = 4,
    /// Teaching staff, larger daily quota
    Instructor = 3,
    /// Regular club member
    Member = 2,
    /// Read-only visitor
    Guest = 1,
}

impl Role {
    /// Normalize a stored or externally supplied role label.
    ///
    /// Profiles written by older clients carry English and Spanish variants
    /// (`user`, `usuario`, `profesor`, `admin`, `administrador`). Anything
    /// unrecognized maps to [`Role::Guest`].
    pub fn from_label(label: &str) -> Role {
        match label.trim().to_ascii_lowercase().as_str() {
            "administrator" | "administrador" | "admin" => Role::Administrator,
            "instructor" | "profesor" | "teacher" => Role::Instructor,
            "member" | "user" | "usuario" | "socio" => Role::Member,
            _ => Role::Guest,
        }
    }

    /// Canonical identifier used when persisting
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::Instructor => "instructor",
            Role::Member => "member",
            Role::Guest => "guest",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Administrator => "Administrator",
            Role::Instructor => "Instructor",
            Role::Member => "Member",
            Role::Guest => "Guest",
        }
    }

    pub fn is_admin(&self) -> bool {
        *self == Role::Administrator
    }

    /// All roles in privilege order (highest first)
    pub fn all_by_privilege() -> &'static [Role] {
        &[
            Role::Administrator,
            Role::Instructor,
            Role::Member,
            Role::Guest,
        ]
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The identity an authorization check is evaluated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }
}

/// Stored club profile linked to an authenticated account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// New registrations start as members
    pub fn new(id: Uuid, name: String, email: String) -> Self {
        Self {
            id,
            name,
            email,
            role: Role::Member,
            created_at: Utc::now(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_labels_normalize() {
        assert_eq!(Role::from_label("user"), Role::Member);
        assert_eq!(Role::from_label("usuario"), Role::Member);
        assert_eq!(Role::from_label("profesor"), Role::Instructor);
        assert_eq!(Role::from_label("Administrador"), Role::Administrator);
        assert_eq!(Role::from_label(" admin "), Role::Administrator);
        assert_eq!(Role::from_label("superuser"), Role::Guest);
        assert_eq!(Role::from_label(""), Role::Guest);
    }

    #[test]
    fn test_canonical_labels_round_trip() {
        for role in Role::all_by_privilege() {
            assert_eq!(Role::from_label(role.as_str()), *role);
        }
    }

    #[test]
    fn test_role_order() {
        assert!(Role::Administrator > Role::Instructor);
        assert!(Role::Instructor > Role::Member);
        assert!(Role::Member > Role::Guest);
    }
}
