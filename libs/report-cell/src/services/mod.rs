pub mod download;
pub mod report;
pub mod storage;

pub use download::ReportDownloader;
pub use report::{filter_by_tab, ReportService};
