//! Time slot schedule
//!
//! The club books courts in fixed-length slots that start at the same
//! wall-clock times every day, for every court.

use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Default slot length in minutes
pub const DEFAULT_SLOT_MINUTES: u32 = 60;

/// First and last default start hours (inclusive)
pub const DEFAULT_FIRST_HOUR: u32 = 9;
pub const DEFAULT_LAST_HOUR: u32 = 20;

/// Error type for schedule construction
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Schedule has no slots")]
    Empty,
    #[error("Slot length must be positive")]
    ZeroLength,
    #[error("Invalid slot time '{0}', expected HH:MM")]
    InvalidTime(String),
    #[error("Slot {0} is not after the previous slot")]
    NotAscending(String),
    #[error("Slot {0} would end after midnight")]
    PastMidnight(String),
    #[error("Slot {0} starts before the previous slot ends")]
    Overlapping(String),
}

/// Drop seconds and sub-seconds; slots match on hour:minute only
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// Parse `HH:MM` or `HH:MM:SS` into a minute-granular time
pub fn parse_slot_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
        .map(truncate_to_minute)
}

/// Format a slot time as `HH:MM`
pub fn format_slot_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Ordered sequence of slot start times sharing one slot length
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSchedule {
    starts: Vec<NaiveTime>,
    slot_minutes: u32,
}

impl SlotSchedule {
    /// Build a schedule, validating ordering, overlap and midnight overflow
    pub fn new(starts: Vec<NaiveTime>, slot_minutes: u32) -> Result<Self, ScheduleError> {
        if starts.is_empty() {
            return Err(ScheduleError::Empty);
        }
        if slot_minutes == 0 {
            return Err(ScheduleError::ZeroLength);
        }

        let starts: Vec<NaiveTime> = starts.into_iter().map(truncate_to_minute).collect();
        for pair in starts.windows(2) {
            if pair[1] <= pair[0] {
                return Err(ScheduleError::NotAscending(format_slot_time(pair[1])));
            }
        }

        let schedule = Self {
            starts,
            slot_minutes,
        };
        let mut previous_end: Option<NaiveTime> = None;
        for &start in &schedule.starts {
            if previous_end.is_some_and(|end| start < end) {
                return Err(ScheduleError::Overlapping(format_slot_time(start)));
            }
            let end = schedule
                .end_of(start)
                .ok_or_else(|| ScheduleError::PastMidnight(format_slot_time(start)))?;
            previous_end = Some(end);
        }
        Ok(schedule)
    }

    /// Parse a schedule from `HH:MM` labels
    pub fn from_labels<S: AsRef<str>>(labels: &[S], slot_minutes: u32) -> Result<Self, ScheduleError> {
        let starts = labels
            .iter()
            .map(|label| {
                parse_slot_time(label.as_ref())
                    .ok_or_else(|| ScheduleError::InvalidTime(label.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(starts, slot_minutes)
    }

    /// Hourly slots starting at `first_hour` through `last_hour` inclusive
    pub fn hourly(first_hour: u32, last_hour: u32) -> Result<Self, ScheduleError> {
        let starts = (first_hour..=last_hour)
            .map(|h| NaiveTime::from_hms_opt(h, 0, 0).ok_or_else(|| ScheduleError::InvalidTime(h.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(starts, 60)
    }

    pub fn slots(&self) -> &[NaiveTime] {
        &self.starts
    }

    pub fn slot_minutes(&self) -> u32 {
        self.slot_minutes
    }

    pub fn slot_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.slot_minutes))
    }

    /// Is `time` (truncated to the minute) one of the start times?
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.starts.contains(&truncate_to_minute(time))
    }

    /// End of the slot starting at `start`, or `None` if it would wrap past midnight
    pub fn end_of(&self, start: NaiveTime) -> Option<NaiveTime> {
        let (end, wrapped) = truncate_to_minute(start).overflowing_add_signed(self.slot_duration());
        if wrapped != 0 {
            None
        } else {
            Some(end)
        }
    }
}

impl Default for SlotSchedule {
    fn default() -> Self {
        let starts = (DEFAULT_FIRST_HOUR..=DEFAULT_LAST_HOUR)
            .filter_map(|h| NaiveTime::from_hms_opt(h, 0, 0))
            .collect();
        Self {
            starts,
            slot_minutes: DEFAULT_SLOT_MINUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> NaiveTime {
        parse_slot_time(s).unwrap()
    }

    #[test]
    fn test_default_schedule_is_hourly_nine_to_twenty() {
        let schedule = SlotSchedule::default();
        assert_eq!(schedule.slots().len(), 12);
        assert_eq!(schedule.slots()[0], t("09:00"));
        assert_eq!(*schedule.slots().last().unwrap(), t("20:00"));
        assert_eq!(schedule, SlotSchedule::hourly(9, 20).unwrap());
    }

    #[test]
    fn test_parse_truncates_seconds() {
        assert_eq!(t("09:00:59"), t("09:00"));
        assert_eq!(format_slot_time(t("10:30:00")), "10:30");
        assert!(parse_slot_time("9am").is_none());
    }

    #[test]
    fn test_end_of_adds_one_slot() {
        let schedule = SlotSchedule::default();
        assert_eq!(schedule.end_of(t("10:00")), Some(t("11:00")));

        let half_hours = SlotSchedule::from_labels(&["09:00", "09:30"], 30).unwrap();
        assert_eq!(half_hours.end_of(t("09:30")), Some(t("10:00")));
    }

    #[test]
    fn test_rejects_bad_schedules() {
        assert_eq!(SlotSchedule::new(vec![], 60), Err(ScheduleError::Empty));
        assert_eq!(
            SlotSchedule::from_labels(&["09:00"], 0),
            Err(ScheduleError::ZeroLength)
        );
        assert_eq!(
            SlotSchedule::from_labels(&["10:00", "09:00"], 60),
            Err(ScheduleError::NotAscending("09:00".to_string()))
        );
        assert_eq!(
            SlotSchedule::from_labels(&["23:00"], 60),
            Err(ScheduleError::PastMidnight("23:00".to_string()))
        );
        assert_eq!(
            SlotSchedule::from_labels(&["25:00"], 60),
            Err(ScheduleError::InvalidTime("25:00".to_string()))
        );
    }

    #[test]
    fn test_rejects_slots_longer_than_their_spacing() {
        assert_eq!(
            SlotSchedule::from_labels(&["09:00", "10:00"], 90),
            Err(ScheduleError::Overlapping("10:00".to_string()))
        );

        // Back-to-back slots and gaps are fine
        assert!(SlotSchedule::from_labels(&["09:00", "10:30"], 90).is_ok());
        assert!(SlotSchedule::from_labels(&["09:00", "12:00"], 60).is_ok());
    }

    #[test]
    fn test_contains_ignores_seconds() {
        let schedule = SlotSchedule::default();
        assert!(schedule.contains(NaiveTime::from_hms_opt(9, 0, 30).unwrap()));
        assert!(!schedule.contains(t("09:30")));
    }
}
