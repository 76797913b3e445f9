use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_database::SupabaseError;
use shared_models::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub patient_id: Uuid,
    #[serde(default)]
    pub doctor_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub report_type: Option<String>,
    #[serde(default)]
    pub status: ReportStatus,
    /// Either a bare object path inside the reports bucket or a full
    /// storage URL.
    pub file_url: String,
    pub created_at: DateTime<Utc>,
}

impl Report {
    /// Patients see their own reports, doctors the ones they wrote.
    pub fn is_visible_to(&self, user_id: &str) -> bool {
        self.patient_id.to_string() == user_id
            || self.doctor_id.is_some_and(|id| id.to_string() == user_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Option<String>")]
pub enum ReportStatus {
    Pending,
    Completed,
    #[default]
    Unknown,
}

impl From<Option<String>> for ReportStatus {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref().map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("pending") => ReportStatus::Pending,
            Some("completed") => ReportStatus::Completed,
            _ => ReportStatus::Unknown,
        }
    }
}

/// The status tab the reports list is viewed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportTab {
    #[default]
    All,
    Pending,
    Completed,
}

impl ReportTab {
    pub fn matches(self, status: ReportStatus) -> bool {
        match self {
            ReportTab::All => true,
            ReportTab::Pending => status == ReportStatus::Pending,
            ReportTab::Completed => status == ReportStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedReportUrl {
    pub report_id: Uuid,
    pub url: String,
    pub expires_in: u64,
    pub file_name: String,
}

#[derive(Debug, Clone)]
pub struct DownloadedReport {
    pub report_id: Uuid,
    pub path: PathBuf,
    pub bytes: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Report not found")]
    NotFound,

    #[error("Report does not belong to the current user")]
    Forbidden,

    #[error("Report has no stored file")]
    MissingFile,

    #[error(transparent)]
    Database(#[from] SupabaseError),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::NotFound => AppError::NotFound(err.to_string()),
            ReportError::Forbidden => AppError::Forbidden(err.to_string()),
            ReportError::MissingFile => AppError::BadRequest(err.to_string()),
            ReportError::Database(e) => e.into(),
        }
    }
}
