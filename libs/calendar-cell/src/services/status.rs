use crate::models::{Appointment, AppointmentStatus, CompositeStatus};

/// Reduces one day's appointments to a single display status.
///
/// The whole set is inspected before deciding: a day is `Mixed` when it has
/// at least one completed appointment and at least one still to come
/// (scheduled or confirmed). Otherwise completed beats upcoming, and a day
/// with neither is `Cancelled`, which also covers unknown statuses. An empty
/// day is `None`.
pub fn aggregate<'a, I>(appointments: I) -> CompositeStatus
where
    I: IntoIterator<Item = &'a Appointment>,
{
    aggregate_statuses(appointments.into_iter().map(|a| a.status))
}

pub fn aggregate_statuses<I>(statuses: I) -> CompositeStatus
where
    I: IntoIterator<Item = AppointmentStatus>,
{
    let mut any = false;
    let mut has_completed = false;
    let mut has_upcoming = false;

    for status in statuses {
        any = true;
        match status {
            AppointmentStatus::Completed => has_completed = true,
            AppointmentStatus::Scheduled | AppointmentStatus::Confirmed => has_upcoming = true,
            AppointmentStatus::Cancelled | AppointmentStatus::Unknown => {}
        }
    }

    match (any, has_completed, has_upcoming) {
        (false, _, _) => CompositeStatus::None,
        (true, true, true) => CompositeStatus::Mixed,
        (true, true, false) => CompositeStatus::Completed,
        (true, false, true) => CompositeStatus::Scheduled,
        (true, false, false) => CompositeStatus::Cancelled,
    }
}
