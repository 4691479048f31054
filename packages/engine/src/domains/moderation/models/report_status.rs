use anyhow::Result;
use sqlx::PgPool;
use std::fmt;

use crate::common::EngineError;

/// Reference row for a report status, seeded by migration.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct ReportStatusRecord {
    pub id: i16,
    pub code: String,
    pub name: String,
}

/// Report lifecycle: pending -> reviewing -> {resolved, dismissed}.
/// One-way; terminal states accept no further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatusCode {
    Pending,
    Reviewing,
    Resolved,
    Dismissed,
}

impl ReportStatusCode {
    pub fn from_code(code: &str) -> Result<Self, EngineError> {
        match code {
            "pending" => Ok(Self::Pending),
            "reviewing" => Ok(Self::Reviewing),
            "resolved" => Ok(Self::Resolved),
            "dismissed" => Ok(Self::Dismissed),
            other => Err(EngineError::Validation(format!(
                "unknown report status '{}'",
                other
            ))),
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewing => "reviewing",
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Dismissed)
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Reviewing)
                | (Self::Reviewing, Self::Resolved)
                | (Self::Reviewing, Self::Dismissed)
        )
    }
}

impl fmt::Display for ReportStatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl ReportStatusRecord {
    pub async fn find_by_code(code: ReportStatusCode, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>("SELECT * FROM report_statuses WHERE code = $1")
            .bind(code.as_code())
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_id(id: i16, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM report_statuses WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::ReportStatusCode::*;

    #[test]
    fn allowed_transitions() {
        assert!(Pending.can_transition_to(Reviewing));
        assert!(Reviewing.can_transition_to(Resolved));
        assert!(Reviewing.can_transition_to(Dismissed));
    }

    #[test]
    fn no_path_back_to_pending() {
        assert!(!Reviewing.can_transition_to(Pending));
        assert!(!Resolved.can_transition_to(Pending));
        assert!(!Dismissed.can_transition_to(Pending));
    }

    #[test]
    fn terminal_states_reject_everything() {
        for terminal in [Resolved, Dismissed] {
            for next in [Pending, Reviewing, Resolved, Dismissed] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn pending_cannot_skip_review() {
        assert!(!Pending.can_transition_to(Resolved));
        assert!(!Pending.can_transition_to(Dismissed));
    }

    #[test]
    fn self_transitions_rejected() {
        for s in [Pending, Reviewing, Resolved, Dismissed] {
            assert!(!s.can_transition_to(s));
        }
    }
}
