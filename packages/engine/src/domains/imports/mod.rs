// Import batch reporting (external ETL collaborator).

pub mod commands;
pub mod models;

pub use commands::{complete_batch, record_outcome, start_batch, RecordOutcome};
pub use models::import_batch::ImportBatchRecord;
pub use models::source_record::SourceRecordRecord;
