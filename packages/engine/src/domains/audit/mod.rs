// Field-level audit trail for privileged mutations.

pub mod diff;
pub mod models;
pub mod recorder;

pub use diff::{diff_snapshots, FieldChange};
pub use models::admin_audit::{AdminAuditFieldChangeRecord, AdminAuditRecord};
