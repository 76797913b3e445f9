use reqwest::Method;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{Report, ReportError, ReportTab, SignedReportUrl};
use crate::services::storage::{download_file_name, resolve_storage_path};

pub struct ReportService {
    supabase: SupabaseClient,
    bucket: String,
    expires_in: u64,
}

impl ReportService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            bucket: config.reports_bucket.clone(),
            expires_in: config.signed_url_expires_in,
        }
    }

    /// A patient's reports, newest first, narrowed to `tab`.
    pub async fn list_reports(
        &self,
        patient_id: &str,
        tab: ReportTab,
        auth_token: &str,
    ) -> Result<Vec<Report>, ReportError> {
        debug!("Fetching {:?} reports for patient: {}", tab, patient_id);

        let path = format!(
            "/rest/v1/reports?patient_id=eq.{}&order=created_at.desc",
            urlencoding::encode(patient_id)
        );
        let reports: Vec<Report> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        Ok(filter_by_tab(reports, tab))
    }

    pub async fn get_report(&self, report_id: &str, auth_token: &str) -> Result<Report, ReportError> {
        debug!("Fetching report: {}", report_id);

        let path = format!("/rest/v1/reports?id=eq.{}", urlencoding::encode(report_id));
        let reports: Vec<Report> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        reports.into_iter().next().ok_or(ReportError::NotFound)
    }

    /// Fetches a report the caller may see, or fails with `Forbidden`.
    pub async fn get_visible_report(
        &self,
        report_id: &str,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Report, ReportError> {
        let report = self.get_report(report_id, auth_token).await?;
        if !report.is_visible_to(user_id) {
            return Err(ReportError::Forbidden);
        }
        Ok(report)
    }

    pub async fn signed_url(&self, report: &Report, auth_token: &str) -> Result<SignedReportUrl, ReportError> {
        let object_path = resolve_storage_path(&report.file_url, &self.bucket)?;
        debug!("Signing {}/{} for {}s", self.bucket, object_path, self.expires_in);

        let url = self
            .supabase
            .create_signed_url(&self.bucket, &object_path, self.expires_in, auth_token)
            .await?;

        Ok(SignedReportUrl {
            report_id: report.id,
            url,
            expires_in: self.expires_in,
            file_name: download_file_name(report, &object_path),
        })
    }
}

pub fn filter_by_tab(reports: Vec<Report>, tab: ReportTab) -> Vec<Report> {
    reports.into_iter().filter(|r| tab.matches(r.status)).collect()
}
