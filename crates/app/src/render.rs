//! Plain-text rendering of grids and listings

use std::fmt::Write;

use courtbook_core::{
    format_slot_time, BookingOutcome, CancellationOutcome, Court, Grid, Profile, ReservationDetails,
};

const CELL_WIDTH: usize = 12;

pub fn grid(grid: &Grid) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Availability for {}", grid.date);

    if grid.rows.is_empty() {
        out.push_str("No courts available\n");
        return out;
    }

    let _ = write!(out, "{:<8}", "Time");
    for row in &grid.rows {
        let _ = write!(out, "{:<width$}", truncate(&row.court.name), width = CELL_WIDTH);
    }
    out.push('\n');

    for (i, slot) in grid.slots.iter().enumerate() {
        let _ = write!(out, "{:<8}", format_slot_time(*slot));
        for row in &grid.rows {
            let label = row.cells.get(i).map(|c| c.state.label()).unwrap_or("?");
            let _ = write!(out, "{:<width$}", label, width = CELL_WIDTH);
        }
        out.push('\n');
    }
    out
}

fn truncate(name: &str) -> String {
    name.chars().take(CELL_WIDTH - 1).collect()
}

pub fn booking(outcome: &BookingOutcome) -> String {
    match outcome {
        BookingOutcome::Booked { reservation } => format!(
            "Booked court {} on {} from {} to {} (reservation {})\n",
            reservation.court_id,
            reservation.date,
            format_slot_time(reservation.start_time),
            format_slot_time(reservation.end_time),
            reservation.id
        ),
        BookingOutcome::Rejected { rejection } => format!("{}\n", rejection),
        BookingOutcome::Conflict => {
            "Someone booked this slot a moment ago, refresh the grid and pick another\n".to_string()
        }
    }
}

pub fn cancellation(outcome: &CancellationOutcome) -> String {
    match outcome {
        CancellationOutcome::Cancelled { reservation } => format!(
            "Cancelled reservation on {} at {}\n",
            reservation.date,
            format_slot_time(reservation.start_time)
        ),
        CancellationOutcome::Rejected { rejection } => format!("{}\n", rejection),
        CancellationOutcome::NotFound => "Reservation not found\n".to_string(),
    }
}

pub fn reservations(list: &[ReservationDetails]) -> String {
    if list.is_empty() {
        return "No reservations\n".to_string();
    }

    let mut out = String::new();
    for details in list {
        let r = &details.reservation;
        let _ = writeln!(
            out,
            "{}  {}  {}-{}  {:<16} {:<16} {}",
            r.id,
            r.date,
            format_slot_time(r.start_time),
            format_slot_time(r.end_time),
            details.court_name,
            details.user_name.as_deref().unwrap_or("N/A"),
            r.user_id
        );
    }
    out
}

pub fn courts(courts: &[Court]) -> String {
    let mut out = String::new();
    for court in courts {
        let status = if court.active { "active" } else { "inactive" };
        let _ = writeln!(out, "{:>4}  {:<24} {}", court.id, court.name, status);
    }
    out
}

pub fn profiles(profiles: &[Profile]) -> String {
    let mut out = String::new();
    for profile in profiles {
        let _ = writeln!(
            out,
            "{}  {:<20} {:<28} {}",
            profile.id,
            profile.name,
            profile.email,
            profile.role.as_str()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use courtbook_core::{AvailabilityEngine, Rejection, Reservation};
    use uuid::Uuid;

    #[test]
    fn test_grid_has_header_and_one_line_per_slot() {
        let courts = vec![Court::new(1, "Court 1"), Court::new(2, "Court 2")];
        let grid = AvailabilityEngine::default().compute_grid(
            &courts,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            &[],
            None,
        );

        let text = super::grid(&grid);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2 + 12);
        assert!(lines[1].contains("Court 1"));
        assert!(lines[2].starts_with("09:00"));
        assert!(lines[2].contains("Free"));
    }

    #[test]
    fn test_quota_message_carries_limit() {
        let text = booking(&BookingOutcome::Rejected {
            rejection: Rejection::QuotaExceeded { limit: 3 },
        });
        assert!(text.contains('3'));
    }

    #[test]
    fn test_outcome_messages_end_with_newline() {
        let reservation = Reservation::new(
            1,
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        );

        let messages = [
            booking(&BookingOutcome::Booked {
                reservation: reservation.clone(),
            }),
            booking(&BookingOutcome::Rejected {
                rejection: Rejection::SlotUnavailable,
            }),
            booking(&BookingOutcome::Conflict),
            cancellation(&CancellationOutcome::Cancelled { reservation }),
            cancellation(&CancellationOutcome::Rejected {
                rejection: Rejection::NotOwner,
            }),
            cancellation(&CancellationOutcome::NotFound),
        ];
        for message in &messages {
            assert!(message.ends_with('\n'), "missing newline: {:?}", message);
            assert_eq!(message.lines().count(), 1);
        }
    }
}
