pub mod content_report;
pub mod report_category;
pub mod report_status;

pub use content_report::*;
pub use report_category::*;
pub use report_status::*;
