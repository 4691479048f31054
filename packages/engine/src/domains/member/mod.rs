// Stored user preferences (default draw filters).

pub mod models;

pub use models::profile::ProfileRecord;
