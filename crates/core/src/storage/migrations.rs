//! Database migration system
//!
//! Tracks schema versions and applies migrations in order.

use rusqlite::Connection;
use tracing::{info, instrument};

use crate::error::Result;

/// A database migration
pub struct Migration {
    /// Version number (must be sequential starting from 1)
    pub version: u32,
    /// Description of what this migration does
    pub description: &'static str,
    /// SQL to run for this migration
    pub sql: &'static str,
}

/// All migrations in order
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema",
        sql: r#"
            -- Club profiles, one per authenticated account
            CREATE TABLE IF NOT EXISTS profiles (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                role TEXT NOT NULL DEFAULT 'member',
                created_at TEXT NOT NULL
            );

            -- Courts
            CREATE TABLE IF NOT EXISTS courts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                active INTEGER NOT NULL DEFAULT 1
            );

            -- Reservations; a court with reservations cannot be deleted
            CREATE TABLE IF NOT EXISTS reservations (
                id TEXT PRIMARY KEY,
                court_id INTEGER NOT NULL,
                user_id TEXT NOT NULL,
                date TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (court_id) REFERENCES courts(id),
                FOREIGN KEY (user_id) REFERENCES profiles(id) ON DELETE CASCADE
            );
        "#,
    },
    Migration {
        version: 2,
        description: "Add double-booking guard and lookup indexes",
        sql: r#"
            -- One reservation per court, date and slot
            CREATE UNIQUE INDEX IF NOT EXISTS idx_reservations_cell
                ON reservations(court_id, date, start_time);

            -- Quota and "my reservations" lookups
            CREATE INDEX IF NOT EXISTS idx_reservations_user_date
                ON reservations(user_id, date);

            CREATE INDEX IF NOT EXISTS idx_reservations_date
                ON reservations(date);
        "#,
    },
];

fn ensure_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
    )?;
    Ok(())
}

fn applied_version(conn: &Connection) -> Result<u32> {
    let version: Option<u32> =
        conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| row.get(0))?;
    Ok(version.unwrap_or(0))
}

/// Schema change and version row commit together, or not at all
fn apply(conn: &Connection, migration: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(migration.sql)?;
    tx.execute(
        "INSERT INTO schema_migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            migration.version,
            migration.description,
            chrono::Utc::now().to_rfc3339()
        ],
    )?;
    tx.commit()?;
    Ok(())
}

fn migrate(conn: &Connection, migrations: &[Migration]) -> Result<u32> {
    ensure_migrations_table(conn)?;
    let from = applied_version(conn)?;

    let mut applied = from;
    for migration in migrations.iter().filter(|m| m.version > from) {
        info!(
            version = migration.version,
            description = migration.description,
            "Applying migration"
        );
        apply(conn, migration)?;
        applied = migration.version;
    }

    if applied > from {
        info!(from, to = applied, "Database schema updated");
    }
    Ok(applied)
}

/// Bring the schema up to the latest version
#[instrument(skip(conn))]
pub fn run_migrations(conn: &Connection) -> Result<()> {
    migrate(conn, MIGRATIONS)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latest_version() -> u32 {
        MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
    }

    #[test]
    fn test_migrations_run() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let version = applied_version(&conn).unwrap();
        assert_eq!(version, latest_version());
    }

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version = applied_version(&conn).unwrap();
        assert_eq!(version, latest_version());
    }

    #[test]
    fn test_migrations_sequential() {
        for (i, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(
                migration.version as usize,
                i + 1,
                "Migration {} should have version {}",
                migration.description,
                i + 1
            );
        }
    }

    #[test]
    fn test_failed_migration_leaves_no_trace() {
        let conn = Connection::open_in_memory().unwrap();
        let broken = [
            Migration {
                version: 1,
                description: "Courts",
                sql: "CREATE TABLE courts (id INTEGER PRIMARY KEY);",
            },
            Migration {
                version: 2,
                description: "Half applied",
                sql: "CREATE TABLE extras (id INTEGER PRIMARY KEY); NOT VALID SQL;",
            },
        ];

        assert!(migrate(&conn, &broken).is_err());
        assert_eq!(applied_version(&conn).unwrap(), 1);

        let extras: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'extras'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(extras, 0);
    }
}
