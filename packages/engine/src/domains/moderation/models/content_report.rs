use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use sqlx::{PgPool, Postgres, Transaction};

use crate::common::{ContentReportId, RecipeId, UserId};

/// A user-submitted content report working through the moderation
/// lifecycle. Status changes are admin-only and audited.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct ContentReportRecord {
    pub id: ContentReportId,
    pub reported_by: Option<UserId>,
    pub recipe_id: Option<RecipeId>,
    pub category_id: i16,
    pub status_id: i16,
    pub comment: Option<String>,
    pub processed_by: Option<UserId>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentReportRecord {
    pub async fn create(
        reported_by: Option<UserId>,
        recipe_id: RecipeId,
        category_id: i16,
        status_id: i16,
        comment: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO content_reports (reported_by, recipe_id, category_id, status_id, comment)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(reported_by)
        .bind(recipe_id)
        .bind(category_id)
        .bind(status_id)
        .bind(comment)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(id: ContentReportId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM content_reports WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn lock_by_id(
        id: ContentReportId,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM content_reports WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Apply a validated status transition. `processed_by`/`processed_at`
    /// are set together with the status when the new state is terminal.
    pub async fn apply_transition(
        id: ContentReportId,
        new_status_id: i16,
        processed_by: Option<UserId>,
        terminal: bool,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE content_reports
             SET status_id = $2,
                 processed_by = CASE WHEN $4 THEN $3 ELSE processed_by END,
                 processed_at = CASE WHEN $4 THEN now() ELSE processed_at END,
                 updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(new_status_id)
        .bind(processed_by)
        .bind(terminal)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn find_by_status(status_id: i16, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM content_reports
             WHERE status_id = $1
             ORDER BY created_at DESC
             LIMIT $2",
        )
        .bind(status_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Flat snapshot of the workflow fields, for audit diffing.
    pub fn workflow_snapshot(&self, status_code: &str) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("status".into(), json!(status_code));
        map.insert(
            "processed_by".into(),
            self.processed_by
                .map(|u| json!(u.to_string()))
                .unwrap_or(Value::Null),
        );
        map
    }
}
