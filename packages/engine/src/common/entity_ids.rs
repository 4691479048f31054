//! Typed ID aliases for the engine's entities.
//!
//! UUID-keyed entities get an `Id<T>` alias; tables keyed by bigserial
//! (versions, draw history, reports, audit rows) use plain `i64` aliases
//! since the database allocates those values.

pub use super::id::{Id, V4, V7};

/// Marker type for users. Ids are issued by the external identity
/// provider, which hands out random (V4) uuids.
pub struct User;

/// Marker type for Recipe entities.
pub struct Recipe;

/// Marker type for PublicShare entities.
pub struct PublicShare;

/// Marker type for draw sessions (client-supplied grouping key).
pub struct DrawSession;

/// Typed ID for users.
pub type UserId = Id<User, V4>;

/// Typed ID for Recipe entities.
pub type RecipeId = Id<Recipe, V4>;

/// Typed ID for PublicShare entities.
pub type ShareId = Id<PublicShare, V4>;

/// Typed ID for draw sessions.
pub type SessionId = Id<DrawSession, V4>;

/// Bigserial ID of a recipe version row.
pub type RecipeVersionId = i64;

/// Bigserial ID of an ingredient row.
pub type IngredientId = i64;

/// Smallint ID of a diet row.
pub type DietId = i16;

/// Bigserial ID of a draw-history row.
pub type DrawHistoryId = i64;

/// Bigserial ID of a daily-pick row.
pub type DailyPickId = i64;

/// Bigserial ID of a content report.
pub type ContentReportId = i64;

/// Bigserial ID of an admin audit row.
pub type AdminAuditId = i64;

/// Bigserial ID of an import batch.
pub type ImportBatchId = i64;
