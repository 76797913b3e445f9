pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{DownloadedReport, Report, ReportError, ReportStatus, ReportTab, SignedReportUrl};
pub use router::report_routes;

pub mod api {
    pub use crate::services::download::ReportDownloader;
    pub use crate::services::report::ReportService;
    pub use crate::services::storage::{download_file_name, resolve_storage_path};
}
