pub mod admin_audit;

pub use admin_audit::*;
