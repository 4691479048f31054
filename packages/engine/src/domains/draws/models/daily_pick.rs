use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::common::{DailyPickId, RecipeId, RecipeVersionId, UserId};

/// One pick per (user, date). The unique constraint on that pair is the
/// concurrency guard; recipe references are nulled on delete so the
/// record of a pick having happened survives content removal.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct DailyPickRecord {
    pub id: DailyPickId,
    pub user_id: UserId,
    pub for_date: NaiveDate,
    pub recipe_id: Option<RecipeId>,
    pub recipe_version_id: Option<RecipeVersionId>,
    pub created_at: DateTime<Utc>,
}

impl DailyPickRecord {
    pub async fn find_by_user_date(
        user_id: UserId,
        for_date: NaiveDate,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM daily_picks WHERE user_id = $1 AND for_date = $2",
        )
        .bind(user_id)
        .bind(for_date)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Raw insert on the caller's transaction; surfaces the sqlx error so
    /// the caller can detect a unique violation and re-read the winner
    /// instead of failing.
    pub async fn insert(
        user_id: UserId,
        for_date: NaiveDate,
        recipe_id: RecipeId,
        recipe_version_id: RecipeVersionId,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO daily_picks (user_id, for_date, recipe_id, recipe_version_id)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(user_id)
        .bind(for_date)
        .bind(recipe_id)
        .bind(recipe_version_id)
        .fetch_one(&mut **tx)
        .await
    }
}
