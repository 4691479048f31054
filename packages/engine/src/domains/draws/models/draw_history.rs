use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::common::{DietId, DrawHistoryId, RecipeId, RecipeVersionId, SessionId, UserId};

/// Append-only log entry per draw. Recipe references are nulled on
/// delete; rows older than the retention window are removed by the
/// reaper, not by the write path.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct DrawHistoryRecord {
    pub id: DrawHistoryId,
    pub user_id: UserId,
    pub recipe_id: Option<RecipeId>,
    pub recipe_version_id: Option<RecipeVersionId>,
    pub prep_time_bucket: i16,
    pub session_id: Option<SessionId>,
    pub seed: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DrawHistoryRecord {
    /// Append one draw, recording the diet filters alongside it. Runs on
    /// the caller's transaction so the draw and its log entry commit
    /// together.
    #[allow(clippy::too_many_arguments)]
    pub async fn append(
        user_id: UserId,
        recipe_id: RecipeId,
        recipe_version_id: RecipeVersionId,
        prep_time_bucket: i16,
        diet_ids: &[DietId],
        session_id: Option<SessionId>,
        seed: Option<&str>,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Self, sqlx::Error> {
        let row = sqlx::query_as::<_, Self>(
            "INSERT INTO draw_history
                 (user_id, recipe_id, recipe_version_id, prep_time_bucket, session_id, seed)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(user_id)
        .bind(recipe_id)
        .bind(recipe_version_id)
        .bind(prep_time_bucket)
        .bind(session_id)
        .bind(seed)
        .fetch_one(&mut **tx)
        .await?;

        for diet_id in diet_ids {
            sqlx::query(
                "INSERT INTO draw_history_diets (draw_history_id, diet_id) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(row.id)
            .bind(diet_id)
            .execute(&mut **tx)
            .await?;
        }

        Ok(row)
    }

    /// Recipe ids of the user's most recent draws, newest first. Drives
    /// the exclusion set; rows whose recipe was deleted are skipped.
    pub async fn recent_recipe_ids(
        user_id: UserId,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<RecipeId>> {
        if limit <= 0 {
            return Ok(Vec::new());
        }
        sqlx::query_scalar(
            "SELECT recipe_id FROM draw_history
             WHERE user_id = $1 AND recipe_id IS NOT NULL
             ORDER BY created_at DESC, id DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_for_user(user_id: UserId, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM draw_history
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// TTL enforcement, called by the reaper. Returns the number of rows
    /// deleted.
    pub async fn delete_older_than(days: i64, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM draw_history WHERE created_at < now() - make_interval(days => $1::int)",
        )
        .bind(days)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
