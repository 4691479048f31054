// Mealdraw - Recipe Versioning & Recommendation Engine
//
// Append-only recipe version history with a single current version per
// recipe, randomized draws with recency exclusion, deterministic daily
// picks, public share links to frozen snapshots, and a field-level audit
// trail for privileged mutations. Transports (HTTP, RPC) are adapters on
// top of the operations in domains/*/commands.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
