use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::models::{Appointment, CalendarCell, CalendarMonth, MonthGrid};
use crate::services::status::aggregate;

/// Canonical `YYYY-MM-DD` key used to match appointments to calendar days.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Cells for `month` (zero-based) of `year`: leading blanks, then one cell
/// per day. A month index past December rolls into the next year; a year
/// outside the supported calendar range yields no cells.
pub fn build_grid(year: i32, month: u32, appointments: &[Appointment]) -> Vec<CalendarCell> {
    match CalendarMonth::normalized(year, month) {
        Some(month) => build_month_grid(month, appointments).cells,
        None => Vec::new(),
    }
}

pub fn build_month_grid(month: CalendarMonth, appointments: &[Appointment]) -> MonthGrid {
    let by_day = index_by_day(appointments);
    let leading_blanks = month.leading_blanks();
    let days_in_month = month.days_in_month();

    let mut cells = Vec::with_capacity((leading_blanks + days_in_month) as usize);
    cells.extend((0..leading_blanks).map(|_| CalendarCell::Empty));

    for date in (1..=days_in_month).filter_map(|day| month.day(day)) {
        let day_appointments = by_day
            .get(&date_key(date))
            .map(Vec::as_slice)
            .unwrap_or_default();

        cells.push(CalendarCell::Day {
            day_number: date.day(),
            date,
            has_appointment: !day_appointments.is_empty(),
            appointment_count: day_appointments.len(),
            composite_status: aggregate(day_appointments.iter().copied()),
        });
    }

    MonthGrid {
        year: month.year(),
        month: month.month(),
        leading_blanks,
        days_in_month,
        cells,
    }
}

/// Appointments on `date`, in the order they were given. `time` is a display
/// string, so ordering is left to the query.
pub fn appointments_on(appointments: &[Appointment], date: NaiveDate) -> Vec<&Appointment> {
    let key = date_key(date);
    appointments
        .iter()
        .filter(|a| date_key(a.date) == key)
        .collect()
}

fn index_by_day(appointments: &[Appointment]) -> HashMap<String, Vec<&Appointment>> {
    let mut by_day: HashMap<String, Vec<&Appointment>> = HashMap::new();
    for appointment in appointments {
        by_day.entry(date_key(appointment.date)).or_default().push(appointment);
    }
    by_day
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentStatus, CompositeStatus};
    use uuid::Uuid;

    fn appointment(date: &str, time: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            doctor_id: None,
            date: date.parse().unwrap(),
            time: Some(time.to_string()),
            status,
            patient_name: Some("Sean Kelly".to_string()),
            appointment_type: None,
            priority: None,
        }
    }

    fn day_cell(cells: &[CalendarCell], leading: usize, day: usize) -> &CalendarCell {
        &cells[leading + day - 1]
    }

    #[test]
    fn test_cell_count_matches_calendar() {
        for (year, month, blanks, days) in [(2023, 1, 3, 28), (2024, 1, 4, 29), (2024, 8, 0, 30), (2023, 11, 5, 31)] {
            let cells = build_grid(year, month, &[]);
            assert_eq!(cells.len(), blanks + days, "{}-{}", year, month + 1);
            assert!(cells[..blanks].iter().all(CalendarCell::is_empty));
            assert!(cells[blanks..].iter().all(|c| !c.is_empty()));
        }
    }

    #[test]
    fn test_day_numbers_are_sequential() {
        let cells = build_grid(2024, 1, &[]);
        let numbers: Vec<u32> = cells
            .iter()
            .filter_map(|c| match c {
                CalendarCell::Day { day_number, .. } => Some(*day_number),
                CalendarCell::Empty => None,
            })
            .collect();
        assert_eq!(numbers, (1..=29).collect::<Vec<_>>());
    }

    #[test]
    fn test_days_without_appointments() {
        let cells = build_grid(2024, 2, &[appointment("2024-03-05", "09:00", AppointmentStatus::Scheduled)]);
        // 1 March 2024 is a Friday.
        match day_cell(&cells, 5, 6) {
            CalendarCell::Day { has_appointment, composite_status, appointment_count, .. } => {
                assert!(!has_appointment);
                assert_eq!(*appointment_count, 0);
                assert_eq!(*composite_status, CompositeStatus::None);
            }
            CalendarCell::Empty => panic!("expected a day cell"),
        }
    }

    #[test]
    fn test_composite_status_per_day() {
        let appointments = vec![
            appointment("2024-03-04", "09:00", AppointmentStatus::Completed),
            appointment("2024-03-04", "11:00", AppointmentStatus::Scheduled),
            appointment("2024-03-05", "09:00", AppointmentStatus::Completed),
            appointment("2024-03-05", "10:00", AppointmentStatus::Completed),
            appointment("2024-03-06", "09:00", AppointmentStatus::Confirmed),
            appointment("2024-03-07", "09:00", AppointmentStatus::Cancelled),
            appointment("2024-03-07", "15:00", AppointmentStatus::Cancelled),
            // Outside the month, ignored.
            appointment("2024-04-04", "09:00", AppointmentStatus::Completed),
        ];
        let cells = build_grid(2024, 2, &appointments);

        assert_eq!(day_cell(&cells, 5, 4).composite_status(), CompositeStatus::Mixed);
        assert_eq!(day_cell(&cells, 5, 5).composite_status(), CompositeStatus::Completed);
        assert_eq!(day_cell(&cells, 5, 6).composite_status(), CompositeStatus::Scheduled);
        assert_eq!(day_cell(&cells, 5, 7).composite_status(), CompositeStatus::Cancelled);

        match day_cell(&cells, 5, 4) {
            CalendarCell::Day { has_appointment, appointment_count, date, .. } => {
                assert!(*has_appointment);
                assert_eq!(*appointment_count, 2);
                assert_eq!(date_key(*date), "2024-03-04");
            }
            CalendarCell::Empty => panic!("expected a day cell"),
        }

        let marked = cells.iter().filter(|c| c.composite_status() != CompositeStatus::None).count();
        assert_eq!(marked, 4);
    }

    #[test]
    fn test_grid_is_idempotent() {
        let appointments = vec![
            appointment("2024-12-24", "09:00", AppointmentStatus::Completed),
            appointment("2024-12-31", "17:00", AppointmentStatus::Scheduled),
        ];
        let month = CalendarMonth::new(2024, 11).unwrap();
        assert_eq!(build_month_grid(month, &appointments), build_month_grid(month, &appointments));
    }

    #[test]
    fn test_december_has_all_days() {
        let appointments = vec![appointment("2024-12-31", "09:00", AppointmentStatus::Scheduled)];
        let grid = build_month_grid(CalendarMonth::new(2024, 11).unwrap(), &appointments);

        assert_eq!(grid.days_in_month, 31);
        assert_eq!(grid.cells.len() as u32, grid.leading_blanks + 31);
        assert_eq!(grid.cells.last().unwrap().composite_status(), CompositeStatus::Scheduled);
    }

    #[test]
    fn test_month_overflow_rolls_into_next_year() {
        assert_eq!(build_grid(2023, 12, &[]), build_grid(2024, 0, &[]));
    }

    #[test]
    fn test_unrepresentable_year_is_empty() {
        assert!(build_grid(i32::MAX, 0, &[]).is_empty());
    }

    #[test]
    fn test_appointments_on_keeps_given_order() {
        let appointments = vec![
            appointment("2024-03-04", "9:30 AM", AppointmentStatus::Completed),
            appointment("2024-03-05", "8:00 AM", AppointmentStatus::Scheduled),
            appointment("2024-03-04", "10:00 AM", AppointmentStatus::Scheduled),
            appointment("2024-03-04", "2:00 PM", AppointmentStatus::Scheduled),
        ];
        let day = appointments_on(&appointments, "2024-03-04".parse().unwrap());
        let times: Vec<_> = day.iter().filter_map(|a| a.time.as_deref()).collect();
        assert_eq!(times, vec!["9:30 AM", "10:00 AM", "2:00 PM"]);
    }
}
