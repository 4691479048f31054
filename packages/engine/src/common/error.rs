use thiserror::Error;

/// Error taxonomy for engine operations.
///
/// Callers can rely on getting a distinguishable kind for every condition
/// listed here; the engine never collapses these into a generic failure.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid report transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("No eligible recipes for the requested filters")]
    NoEligibleRecipes,

    #[error("Share is disabled")]
    Disabled,

    #[error("Share has expired")]
    Expired,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl EngineError {
    /// True when the wrapped sqlx error is a unique-constraint violation.
    ///
    /// Unique violations are how races surface (version number, daily
    /// pick, share slug); callers recover per operation rather than
    /// treating them as hard failures.
    pub fn is_unique_violation(err: &sqlx::Error) -> bool {
        matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
    }

    /// Maps `RowNotFound` to `NotFound`, everything else to `Database`.
    pub fn from_fetch(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => EngineError::NotFound,
            other => EngineError::Database(other),
        }
    }
}
