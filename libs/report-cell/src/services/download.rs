use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{DownloadedReport, Report};
use crate::services::storage::{download_file_name, resolve_storage_path};

/// Saves report files locally through short-lived signed URLs.
pub struct ReportDownloader {
    supabase: SupabaseClient,
    bucket: String,
    expires_in: u64,
    download_dir: PathBuf,
}

impl ReportDownloader {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            bucket: config.reports_bucket.clone(),
            expires_in: config.signed_url_expires_in,
            download_dir: config.report_download_dir.clone(),
        }
    }

    pub async fn download(&self, report: &Report, auth_token: &str) -> Result<DownloadedReport> {
        self.download_into(report, &self.download_dir, auth_token).await
    }

    pub async fn download_into(&self, report: &Report, dir: &Path, auth_token: &str) -> Result<DownloadedReport> {
        let object_path = resolve_storage_path(&report.file_url, &self.bucket)?;

        let url = self
            .supabase
            .create_signed_url(&self.bucket, &object_path, self.expires_in, auth_token)
            .await
            .with_context(|| format!("Failed to sign {}/{}", self.bucket, object_path))?;

        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create download directory {}", dir.display()))?;

        let destination = dir.join(download_file_name(report, &object_path));
        let bytes = self
            .supabase
            .download_to_file(&url, &destination)
            .await
            .with_context(|| format!("Failed to download report {}", report.id))?;

        info!("Downloaded report {} ({} bytes) to {}", report.id, bytes, destination.display());

        Ok(DownloadedReport {
            report_id: report.id,
            path: destination,
            bytes,
        })
    }
}
