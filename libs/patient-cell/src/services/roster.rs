use std::cmp::Ordering;
use std::collections::HashMap;

use reqwest::Method;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{PatientSummary, Prescription, RosterEntry, RosterError};

const PRESCRIPTION_SELECT: &str = "*,patient:patients(id,first_name,last_name,email,phone_number)";

pub struct RosterService {
    supabase: SupabaseClient,
}

impl RosterService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Every patient the doctor has prescribed for, sorted by name.
    pub async fn roster(
        &self,
        doctor_id: &str,
        search: Option<&str>,
        auth_token: &str,
    ) -> Result<Vec<RosterEntry>, RosterError> {
        debug!("Fetching patient roster for doctor: {}", doctor_id);

        let path = format!(
            "/rest/v1/prescriptions?doctor_id=eq.{}&select={}&order=prescribed_date.desc",
            urlencoding::encode(doctor_id),
            PRESCRIPTION_SELECT,
        );
        let prescriptions: Vec<Prescription> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let mut roster = build_roster(prescriptions);

        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            roster.retain(|entry| entry.patient.full_name().to_lowercase().contains(&term));
        }

        debug!("Roster for doctor {} has {} patients", doctor_id, roster.len());
        Ok(roster)
    }

    /// One patient's prescriptions from this doctor, newest first.
    pub async fn patient_history(
        &self,
        doctor_id: &str,
        patient_id: Uuid,
        auth_token: &str,
    ) -> Result<RosterEntry, RosterError> {
        debug!("Fetching prescription history of patient {} for doctor {}", patient_id, doctor_id);

        let path = format!(
            "/rest/v1/prescriptions?doctor_id=eq.{}&patient_id=eq.{}&select={}&order=prescribed_date.desc",
            urlencoding::encode(doctor_id),
            patient_id,
            PRESCRIPTION_SELECT,
        );
        let prescriptions: Vec<Prescription> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        build_roster(prescriptions)
            .into_iter()
            .find(|entry| entry.patient.id == patient_id)
            .ok_or(RosterError::NotFound)
    }
}

/// Groups prescriptions by patient.
pub fn build_roster(prescriptions: Vec<Prescription>) -> Vec<RosterEntry> {
    let mut grouped: HashMap<Uuid, (Option<PatientSummary>, Vec<Prescription>)> = HashMap::new();

    for mut prescription in prescriptions {
        let (patient, history) = grouped.entry(prescription.patient_id).or_default();
        if let Some(embedded) = prescription.patient.take() {
            patient.get_or_insert(embedded);
        }
        history.push(prescription);
    }

    let mut roster: Vec<RosterEntry> = grouped
        .into_iter()
        .map(|(patient_id, (patient, mut history))| {
            sort_history(&mut history);
            RosterEntry {
                patient: patient.unwrap_or_else(|| PatientSummary::unknown(patient_id)),
                last_prescribed: history.first().map(|p| p.prescribed_date),
                prescription_count: history.len(),
                prescriptions: history,
            }
        })
        .collect();

    roster.sort_by(|a, b| compare_patients(&a.patient, &b.patient));
    roster
}

/// Newest prescription first; same-day entries by creation time, newest first.
pub fn sort_history(history: &mut [Prescription]) {
    history.sort_by(|a, b| {
        b.prescribed_date
            .cmp(&a.prescribed_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

fn compare_patients(a: &PatientSummary, b: &PatientSummary) -> Ordering {
    a.last_name
        .to_lowercase()
        .cmp(&b.last_name.to_lowercase())
        .then_with(|| a.first_name.to_lowercase().cmp(&b.first_name.to_lowercase()))
        .then_with(|| a.id.cmp(&b.id))
}
