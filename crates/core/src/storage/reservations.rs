//! Reservation storage operations

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{
    conflict_on_constraint, date_to_sql, parse_date, parse_datetime, parse_time, parse_uuid,
    time_to_sql, OptionalExt,
};
use crate::error::Result;
use crate::models::{Reservation, ReservationDetails};

const RESERVATION_COLUMNS: &str =
    "r.id, r.court_id, r.user_id, r.date, r.start_time, r.end_time, r.created_at";

pub struct ReservationStore<'a> {
    conn: &'a Connection,
}

fn reservation_from_row(row: &Row<'_>) -> rusqlite::Result<Reservation> {
    Ok(Reservation {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        court_id: row.get(1)?,
        user_id: parse_uuid(&row.get::<_, String>(2)?)?,
        date: parse_date(&row.get::<_, String>(3)?)?,
        start_time: parse_time(&row.get::<_, String>(4)?)?,
        end_time: parse_time(&row.get::<_, String>(5)?)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?)?,
    })
}

fn details_from_row(row: &Row<'_>) -> rusqlite::Result<ReservationDetails> {
    Ok(ReservationDetails {
        reservation: reservation_from_row(row)?,
        court_name: row.get(7)?,
        user_name: row.get(8)?,
    })
}

impl<'a> ReservationStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a reservation. A taken cell surfaces as a conflict.
    #[instrument(skip(self, reservation), fields(court_id = reservation.court_id, date = %reservation.date))]
    pub fn insert(&self, reservation: &Reservation) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO reservations (id, court_id, user_id, date, start_time, end_time, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    reservation.id.to_string(),
                    reservation.court_id,
                    reservation.user_id.to_string(),
                    date_to_sql(reservation.date),
                    time_to_sql(reservation.start_time),
                    time_to_sql(reservation.end_time),
                    reservation.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| conflict_on_constraint(e, "slot already booked"))?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>> {
        let sql = format!(
            "SELECT {} FROM reservations r WHERE r.id = ?1",
            RESERVATION_COLUMNS
        );
        let reservation = self
            .conn
            .query_row(&sql, params![id.to_string()], reservation_from_row)
            .optional()?;
        Ok(reservation)
    }

    /// Delete a reservation, returning whether a row was removed
    #[instrument(skip(self))]
    pub fn delete(&self, id: Uuid) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM reservations WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(deleted > 0)
    }

    /// Every reservation on a date, in slot order
    pub fn list_for_date(&self, date: NaiveDate) -> Result<Vec<Reservation>> {
        let sql = format!(
            "SELECT {} FROM reservations r WHERE r.date = ?1 ORDER BY r.start_time, r.court_id",
            RESERVATION_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let reservations = stmt
            .query_map(params![date_to_sql(date)], reservation_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(reservations)
    }

    /// One user's reservations on a date
    pub fn list_for_user_on_date(&self, user_id: Uuid, date: NaiveDate) -> Result<Vec<Reservation>> {
        let sql = format!(
            "SELECT {} FROM reservations r WHERE r.user_id = ?1 AND r.date = ?2 ORDER BY r.start_time",
            RESERVATION_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let reservations = stmt
            .query_map(
                params![user_id.to_string(), date_to_sql(date)],
                reservation_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(reservations)
    }

    /// A user's reservations from `from` onward, with court names
    pub fn list_for_user_from(&self, user_id: Uuid, from: NaiveDate) -> Result<Vec<ReservationDetails>> {
        let sql = format!(
            "SELECT {}, c.name, p.name
             FROM reservations r
             JOIN courts c ON c.id = r.court_id
             LEFT JOIN profiles p ON p.id = r.user_id
             WHERE r.user_id = ?1 AND r.date >= ?2
             ORDER BY r.date, r.start_time",
            RESERVATION_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let details = stmt
            .query_map(params![user_id.to_string(), date_to_sql(from)], details_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(details)
    }

    /// Every reservation with court and user names, newest date first
    pub fn list_all_details(&self) -> Result<Vec<ReservationDetails>> {
        let sql = format!(
            "SELECT {}, c.name, p.name
             FROM reservations r
             JOIN courts c ON c.id = r.court_id
             LEFT JOIN profiles p ON p.id = r.user_id
             ORDER BY r.date DESC, r.start_time, c.name",
            RESERVATION_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let details = stmt
            .query_map([], details_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use uuid::Uuid;

    use crate::models::{Profile, Reservation};
    use crate::storage::Database;

    fn setup() -> (Database, i64, Uuid) {
        let db = Database::open_in_memory().unwrap();
        let court = db.courts().create("Court 1").unwrap();
        let user_id = Uuid::new_v4();
        db.profiles()
            .create(&Profile::new(user_id, "Ana".to_string(), "ana@club.test".to_string()))
            .unwrap();
        (db, court.id, user_id)
    }

    fn at(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 10).unwrap()
    }

    #[test]
    fn test_insert_and_find() {
        let (db, court_id, user_id) = setup();
        let reservation = Reservation::new(court_id, user_id, day(), at(9), at(10));
        db.reservations().insert(&reservation).unwrap();

        let found = db.reservations().find_by_id(reservation.id).unwrap().unwrap();
        assert_eq!(found.court_id, court_id);
        assert_eq!(found.start_time, at(9));
        assert_eq!(found.end_time, at(10));
        assert_eq!(found.date, day());
    }

    #[test]
    fn test_same_cell_is_conflict() {
        let (db, court_id, user_id) = setup();
        db.reservations()
            .insert(&Reservation::new(court_id, user_id, day(), at(9), at(10)))
            .unwrap();

        let err = db
            .reservations()
            .insert(&Reservation::new(court_id, user_id, day(), at(9), at(10)))
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_list_for_date_and_user() {
        let (db, court_id, user_id) = setup();
        db.reservations()
            .insert(&Reservation::new(court_id, user_id, day(), at(11), at(12)))
            .unwrap();
        db.reservations()
            .insert(&Reservation::new(court_id, user_id, day(), at(9), at(10)))
            .unwrap();
        db.reservations()
            .insert(&Reservation::new(court_id, user_id, day().succ_opt().unwrap(), at(9), at(10)))
            .unwrap();

        let on_day = db.reservations().list_for_date(day()).unwrap();
        assert_eq!(on_day.len(), 2);
        assert_eq!(on_day[0].start_time, at(9));

        let mine = db.reservations().list_for_user_on_date(user_id, day()).unwrap();
        assert_eq!(mine.len(), 2);

        let upcoming = db.reservations().list_for_user_from(user_id, day()).unwrap();
        assert_eq!(upcoming.len(), 3);
        assert_eq!(upcoming[0].court_name, "Court 1");
        assert_eq!(upcoming[0].user_name.as_deref(), Some("Ana"));
        assert_eq!(upcoming[2].reservation.date, day().succ_opt().unwrap());
    }

    #[test]
    fn test_delete() {
        let (db, court_id, user_id) = setup();
        let reservation = Reservation::new(court_id, user_id, day(), at(9), at(10));
        db.reservations().insert(&reservation).unwrap();

        assert!(db.reservations().delete(reservation.id).unwrap());
        assert!(!db.reservations().delete(reservation.id).unwrap());
        assert!(db.reservations().find_by_id(reservation.id).unwrap().is_none());
    }

    #[test]
    fn test_court_with_reservations_cannot_be_deleted() {
        let (db, court_id, user_id) = setup();
        db.reservations()
            .insert(&Reservation::new(court_id, user_id, day(), at(9), at(10)))
            .unwrap();

        let err = db.courts().delete(court_id).unwrap_err();
        assert!(err.is_conflict());
    }
}
