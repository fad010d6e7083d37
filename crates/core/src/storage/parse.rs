//! Database value parsing utilities
//!
//! Provides error-safe parsing of stored values and the mapping from
//! SQLite constraint failures to typed store errors.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::Error as SqlError;
use rusqlite::ErrorCode;
use uuid::Uuid;

use crate::error::Error;
use crate::models::{format_slot_time, parse_slot_time, Role};

/// Stored date format
const DATE_FORMAT: &str = "%Y-%m-%d";

fn conversion_error<E>(e: E) -> SqlError
where
    E: std::error::Error + Send + Sync + 'static,
{
    SqlError::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
}

/// Parse a UUID from a database string column
pub fn parse_uuid(s: &str) -> Result<Uuid, SqlError> {
    Uuid::parse_str(s).map_err(conversion_error)
}

/// Parse a DateTime from an RFC3339 string
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, SqlError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(conversion_error)
}

/// Parse a `YYYY-MM-DD` date column
pub fn parse_date(s: &str) -> Result<NaiveDate, SqlError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(conversion_error)
}

/// Parse a `HH:MM` (or legacy `HH:MM:SS`) time column
pub fn parse_time(s: &str) -> Result<NaiveTime, SqlError> {
    parse_slot_time(s).ok_or_else(|| {
        SqlError::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("invalid slot time '{}'", s).into(),
        )
    })
}

pub fn date_to_sql(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn time_to_sql(time: NaiveTime) -> String {
    format_slot_time(time)
}

/// Convert a stored role label to Role
pub fn role_from_label(label: &str) -> Role {
    Role::from_label(label)
}

/// Map constraint violations to [`Error::Conflict`], everything else to
/// [`Error::Database`]
pub fn conflict_on_constraint(err: SqlError, context: &str) -> Error {
    match &err {
        SqlError::SqliteFailure(failure, _) if failure.code == ErrorCode::ConstraintViolation => {
            Error::Conflict(format!("{}: {}", context, err))
        }
        _ => Error::Database(err),
    }
}

/// Extension trait for converting rusqlite Results to Option
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, SqlError>;
}

impl<T> OptionalExt<T> for Result<T, SqlError> {
    fn optional(self) -> Result<Option<T>, SqlError> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(SqlError::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
