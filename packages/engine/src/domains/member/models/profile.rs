use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::{DietId, EngineError, UserId};

/// Stored user preferences. Identity itself comes from the external
/// identity provider; this row only holds the defaults the daily pick
/// scheduler draws with.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct ProfileRecord {
    pub user_id: UserId,
    pub display_name: Option<String>,
    pub default_prep_time_bucket: i16,
    pub locale: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    pub async fn find_by_user(user_id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn upsert(
        user_id: UserId,
        display_name: Option<&str>,
        default_prep_time_bucket: i16,
        locale: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self, EngineError> {
        if !matches!(default_prep_time_bucket, 15 | 30 | 45 | 60) {
            return Err(EngineError::Validation(format!(
                "default_prep_time_bucket must be one of 15, 30, 45, 60, got {}",
                default_prep_time_bucket
            )));
        }
        if let Some(locale) = locale {
            if !(2..=10).contains(&locale.len()) {
                return Err(EngineError::Validation(
                    "locale must be between 2 and 10 characters".into(),
                ));
            }
        }

        sqlx::query_as::<_, Self>(
            "INSERT INTO profiles (user_id, display_name, default_prep_time_bucket, locale)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id) DO UPDATE SET
                 display_name = EXCLUDED.display_name,
                 default_prep_time_bucket = EXCLUDED.default_prep_time_bucket,
                 locale = EXCLUDED.locale,
                 updated_at = now()
             RETURNING *",
        )
        .bind(user_id)
        .bind(display_name)
        .bind(default_prep_time_bucket)
        .bind(locale)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn diet_ids(user_id: UserId, pool: &PgPool) -> Result<Vec<DietId>> {
        sqlx::query_scalar(
            "SELECT diet_id FROM user_diets WHERE user_id = $1 ORDER BY diet_id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Replace the user's diet preference set.
    pub async fn replace_diets(
        user_id: UserId,
        diet_ids: &[DietId],
        pool: &PgPool,
    ) -> Result<()> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM user_diets WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        for diet_id in diet_ids {
            sqlx::query("INSERT INTO user_diets (user_id, diet_id) VALUES ($1, $2)")
                .bind(user_id)
                .bind(diet_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
