//! Court storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;

use super::parse::{conflict_on_constraint, OptionalExt};
use crate::error::{Error, Result};
use crate::models::{Court, CourtId};

pub struct CourtStore<'a> {
    conn: &'a Connection,
}

fn court_from_row(row: &Row<'_>) -> rusqlite::Result<Court> {
    Ok(Court {
        id: row.get(0)?,
        name: row.get(1)?,
        active: row.get(2)?,
    })
}

impl<'a> CourtStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new active court and return it with its assigned id
    #[instrument(skip(self))]
    pub fn create(&self, name: &str) -> Result<Court> {
        self.conn.execute(
            "INSERT INTO courts (name, active) VALUES (?1, 1)",
            params![name],
        )?;
        Ok(Court::new(self.conn.last_insert_rowid(), name))
    }

    /// Find court by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: CourtId) -> Result<Option<Court>> {
        let court = self
            .conn
            .query_row(
                "SELECT id, name, active FROM courts WHERE id = ?1",
                params![id],
                court_from_row,
            )
            .optional()?;
        Ok(court)
    }

    /// Active courts in id order, as shown on the booking grid
    pub fn list_active(&self) -> Result<Vec<Court>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, active FROM courts WHERE active = 1 ORDER BY id")?;
        let courts = stmt
            .query_map([], court_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(courts)
    }

    /// Every court in name order, as shown to administrators
    pub fn list_all(&self) -> Result<Vec<Court>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, active FROM courts ORDER BY name, id")?;
        let courts = stmt
            .query_map([], court_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(courts)
    }

    #[instrument(skip(self))]
    pub fn rename(&self, id: CourtId, name: &str) -> Result<()> {
        let updated = self
            .conn
            .execute("UPDATE courts SET name = ?1 WHERE id = ?2", params![name, id])?;
        if updated == 0 {
            return Err(Error::NotFound(format!("court {}", id)));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn set_active(&self, id: CourtId, active: bool) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE courts SET active = ?1 WHERE id = ?2",
            params![active, id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("court {}", id)));
        }
        Ok(())
    }

    /// Delete a court. Fails with a conflict while reservations reference it.
    #[instrument(skip(self))]
    pub fn delete(&self, id: CourtId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM courts WHERE id = ?1", params![id])
            .map_err(|e| conflict_on_constraint(e, "court still has reservations"))?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("court {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::Database;

    #[test]
    fn test_create_and_find() {
        let db = Database::open_in_memory().unwrap();
        let court = db.courts().create("Court 1").unwrap();

        let found = db.courts().find_by_id(court.id).unwrap().unwrap();
        assert_eq!(found, court);
        assert!(found.active);
    }

    #[test]
    fn test_active_listing_hides_inactive() {
        let db = Database::open_in_memory().unwrap();
        let a = db.courts().create("Beta").unwrap();
        let b = db.courts().create("Alpha").unwrap();
        db.courts().set_active(a.id, false).unwrap();

        let active = db.courts().list_active().unwrap();
        assert_eq!(active, vec![b.clone()]);

        let all = db.courts().list_all().unwrap();
        let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_rename_missing_court() {
        let db = Database::open_in_memory().unwrap();
        let err = db.courts().rename(42, "Nope").unwrap_err();
        assert!(matches!(err, crate::Error::NotFound(_)));
    }
}
