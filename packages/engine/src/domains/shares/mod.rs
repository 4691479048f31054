// Public share links to frozen version snapshots.

pub mod commands;
pub mod models;

pub use commands::{create_share, resolve, update_share, ResolvedShare};
pub use models::public_share::PublicShareRecord;
