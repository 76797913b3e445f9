use chrono::NaiveDate;
use reqwest::Method;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{Appointment, CalendarError, CalendarMonth, MonthGrid};
use crate::services::grid::{build_month_grid, date_key};

pub struct ScheduleService {
    supabase: SupabaseClient,
}

impl ScheduleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// All of a doctor's appointments between the first and last day of `month`.
    pub async fn month_appointments(
        &self,
        doctor_id: &str,
        month: CalendarMonth,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, CalendarError> {
        debug!("Fetching appointments for doctor {} in {}", doctor_id, month);

        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&date=gte.{}&date=lte.{}&order=date.asc,time.asc",
            urlencoding::encode(doctor_id),
            date_key(month.first_day()),
            date_key(month.last_day()),
        );

        let appointments: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        debug!("Fetched {} appointments for {}", appointments.len(), month);
        Ok(appointments)
    }

    /// One day's appointments in the order the query returns them.
    pub async fn day_appointments(
        &self,
        doctor_id: &str,
        date: NaiveDate,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, CalendarError> {
        debug!("Fetching appointments for doctor {} on {}", doctor_id, date);

        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&date=eq.{}&order=time.asc",
            urlencoding::encode(doctor_id),
            date_key(date),
        );

        let appointments: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        debug!("Fetched {} appointments for {}", appointments.len(), date);
        Ok(appointments)
    }

    pub async fn month_grid(
        &self,
        doctor_id: &str,
        month: CalendarMonth,
        auth_token: &str,
    ) -> Result<MonthGrid, CalendarError> {
        let appointments = self.month_appointments(doctor_id, month, auth_token).await?;
        Ok(build_month_grid(month, &appointments))
    }
}
