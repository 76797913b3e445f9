use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_database::SupabaseError;
use shared_models::error::AppError;

/// Patient columns embedded in prescription rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: Uuid,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl PatientSummary {
    pub fn unknown(id: Uuid) -> Self {
        Self {
            id,
            first_name: "Unknown".to_string(),
            last_name: String::new(),
            email: None,
            phone_number: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub medication: String,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub prescribed_date: NaiveDate,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<PatientSummary>,
}

/// One patient on a doctor's roster with their prescription history,
/// newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub patient: PatientSummary,
    pub last_prescribed: Option<NaiveDate>,
    pub prescription_count: usize,
    pub prescriptions: Vec<Prescription>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterQuery {
    /// Case-insensitive match against the patient's full name.
    pub search: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("Patient not found")]
    NotFound,

    #[error("Invalid patient id: {0}")]
    InvalidPatientId(String),

    #[error(transparent)]
    Database(#[from] SupabaseError),
}

/// Parses a patient id from a URL segment. Any UUID spelling is accepted.
pub fn parse_patient_id(raw: &str) -> Result<Uuid, RosterError> {
    Uuid::parse_str(raw.trim()).map_err(|_| RosterError::InvalidPatientId(raw.to_string()))
}

impl From<RosterError> for AppError {
    fn from(err: RosterError) -> Self {
        match err {
            RosterError::NotFound => AppError::NotFound(err.to_string()),
            RosterError::InvalidPatientId(_) => AppError::ValidationError(err.to_string()),
            RosterError::Database(e) => e.into(),
        }
    }
}
