//! Profile storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{conflict_on_constraint, parse_datetime, parse_uuid, role_from_label, OptionalExt};
use crate::error::{Error, Result};
use crate::models::{Profile, Role};

pub struct ProfileStore<'a> {
    conn: &'a Connection,
}

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: role_from_label(&row.get::<_, String>(3)?),
        created_at: parse_datetime(&row.get::<_, String>(4)?)?,
    })
}

impl<'a> ProfileStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new profile
    #[instrument(skip(self, profile), fields(profile_id = %profile.id))]
    pub fn create(&self, profile: &Profile) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO profiles (id, name, email, role, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    profile.id.to_string(),
                    profile.name,
                    profile.email,
                    profile.role.as_str(),
                    profile.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| conflict_on_constraint(e, "profile already exists"))?;
        Ok(())
    }

    /// Find profile by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>> {
        let profile = self
            .conn
            .query_row(
                "SELECT id, name, email, role, created_at FROM profiles WHERE id = ?1",
                params![id.to_string()],
                profile_from_row,
            )
            .optional()?;
        Ok(profile)
    }

    /// All profiles by name
    pub fn list(&self) -> Result<Vec<Profile>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, email, role, created_at FROM profiles ORDER BY name")?;
        let profiles = stmt
            .query_map([], profile_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(profiles)
    }

    #[instrument(skip(self))]
    pub fn update_role(&self, id: Uuid, role: Role) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE profiles SET role = ?1 WHERE id = ?2",
            params![role.as_str(), id.to_string()],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("profile {}", id)));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn update_name(&self, id: Uuid, name: &str) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE profiles SET name = ?1 WHERE id = ?2",
            params![name, id.to_string()],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("profile {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use tempfile::tempdir;

    #[test]
    fn test_create_defaults_to_member() {
        let db = Database::open_in_memory().unwrap();
        let profile = Profile::new(Uuid::new_v4(), "Luis".to_string(), "luis@club.test".to_string());
        db.profiles().create(&profile).unwrap();

        let found = db.profiles().find_by_id(profile.id).unwrap().unwrap();
        assert_eq!(found.role, Role::Member);
        assert_eq!(found.email, "luis@club.test");
    }

    #[test]
    fn test_duplicate_email_is_conflict() {
        let db = Database::open_in_memory().unwrap();
        db.profiles()
            .create(&Profile::new(Uuid::new_v4(), "A".to_string(), "same@club.test".to_string()))
            .unwrap();
        let err = db
            .profiles()
            .create(&Profile::new(Uuid::new_v4(), "B".to_string(), "same@club.test".to_string()))
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_legacy_role_rows_are_normalized() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db")).unwrap();
        let id = Uuid::new_v4();
        db.profiles()
            .create(&Profile::new(id, "Marta".to_string(), "marta@club.test".to_string()))
            .unwrap();

        db.conn
            .execute(
                "UPDATE profiles SET role = 'profesor' WHERE id = ?1",
                params![id.to_string()],
            )
            .unwrap();

        let found = db.profiles().find_by_id(id).unwrap().unwrap();
        assert_eq!(found.role, Role::Instructor);
    }

    #[test]
    fn test_update_role_and_name() {
        let db = Database::open_in_memory().unwrap();
        let id = Uuid::new_v4();
        db.profiles()
            .create(&Profile::new(id, "Old".to_string(), "x@club.test".to_string()))
            .unwrap();

        db.profiles().update_role(id, Role::Instructor).unwrap();
        db.profiles().update_name(id, "New name").unwrap();

        let found = db.profiles().find_by_id(id).unwrap().unwrap();
        assert_eq!(found.role, Role::Instructor);
        assert_eq!(found.name, "New name");

        let err = db.profiles().update_role(Uuid::new_v4(), Role::Member).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
