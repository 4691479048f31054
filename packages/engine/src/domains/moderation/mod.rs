// Content report workflow (admin-driven).

pub mod commands;
pub mod models;

pub use commands::{create_report, transition_report};
pub use models::content_report::ContentReportRecord;
pub use models::report_status::ReportStatusCode;
