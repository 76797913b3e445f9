use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use shared_database::SupabaseError;
use shared_models::error::AppError;

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

/// Appointment row as returned by the `appointments` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    #[serde(default)]
    pub doctor_id: Option<Uuid>,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(rename = "type", default)]
    pub appointment_type: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// Status of a single appointment. Values the portal does not know, and a
/// missing status, become `Unknown` instead of failing the whole query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Option<String>")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    #[default]
    Unknown,
}

impl From<Option<String>> for AppointmentStatus {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref().map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("scheduled") => AppointmentStatus::Scheduled,
            Some("confirmed") => AppointmentStatus::Confirmed,
            Some("completed") => AppointmentStatus::Completed,
            Some("cancelled") | Some("canceled") => AppointmentStatus::Cancelled,
            _ => AppointmentStatus::Unknown,
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Unknown => write!(f, "unknown"),
        }
    }
}

// ==============================================================================
// CALENDAR GRID
// ==============================================================================

/// One display status standing for every appointment on a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeStatus {
    Completed,
    Scheduled,
    Mixed,
    Cancelled,
    None,
}

impl CompositeStatus {
    /// Colour of the day marker, `None` when the day gets no marker.
    pub fn indicator(self) -> Option<&'static str> {
        match self {
            CompositeStatus::Completed => Some("green"),
            CompositeStatus::Scheduled => Some("blue"),
            CompositeStatus::Mixed => Some("orange"),
            CompositeStatus::Cancelled => Some("red"),
            CompositeStatus::None => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalendarCell {
    /// Padding before the first day of the month.
    Empty,
    Day {
        day_number: u32,
        date: NaiveDate,
        has_appointment: bool,
        appointment_count: usize,
        composite_status: CompositeStatus,
    },
}

impl CalendarCell {
    pub fn is_empty(&self) -> bool {
        matches!(self, CalendarCell::Empty)
    }

    pub fn composite_status(&self) -> CompositeStatus {
        match self {
            CalendarCell::Empty => CompositeStatus::None,
            CalendarCell::Day { composite_status, .. } => *composite_status,
        }
    }
}

/// A calendar month with a zero-based month index (0 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarMonth {
    first: NaiveDate,
    last: NaiveDate,
}

impl CalendarMonth {
    /// `None` when `month > 11` or the month lies outside the supported
    /// calendar range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if month > 11 {
            return None;
        }
        let first = NaiveDate::from_ymd_opt(year, month + 1, 1)?;
        // Day 0 of the next month.
        let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
        Some(Self { first, last })
    }

    /// Like [`CalendarMonth::new`], but a month index past December rolls
    /// into the following year(s).
    pub fn normalized(year: i32, month: u32) -> Option<Self> {
        let carry = i32::try_from(month / 12).ok()?;
        Self::new(year.checked_add(carry)?, month % 12)
    }

    pub fn containing(date: NaiveDate) -> Option<Self> {
        Self::new(date.year(), date.month0())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// Zero-based month index.
    pub fn month(&self) -> u32 {
        self.first.month0()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last
    }

    pub fn days_in_month(&self) -> u32 {
        self.last.day()
    }

    /// Blank cells before day 1, with weeks starting on Sunday.
    pub fn leading_blanks(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }

    pub fn next(&self) -> Option<Self> {
        Self::containing(self.last.succ_opt()?)
    }

    pub fn previous(&self) -> Option<Self> {
        Self::containing(self.first.pred_opt()?)
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first.format("%Y-%m"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGrid {
    pub year: i32,
    /// Zero-based (0 = January).
    pub month: u32,
    pub leading_blanks: u32,
    pub days_in_month: u32,
    pub cells: Vec<CalendarCell>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("Invalid month {month} for year {year}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Invalid date {year}-{month}-{day}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error(transparent)]
    Database(#[from] SupabaseError),
}

impl From<CalendarError> for AppError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::InvalidMonth { .. } | CalendarError::InvalidDate { .. } => {
                AppError::ValidationError(err.to_string())
            }
            CalendarError::Database(e) => e.into(),
        }
    }
}
