pub mod admin;
pub mod version_store;
