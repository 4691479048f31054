use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use sqlx::{PgPool, Postgres, Transaction};

use crate::common::{RecipeId, RecipeVersionId, UserId};

/// Recipe identity row. Content lives in `recipe_versions`; this row only
/// carries the current-version pointer and the block flag.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct RecipeRecord {
    pub id: RecipeId,
    pub is_blocked: bool,
    pub blocked_at: Option<DateTime<Utc>>,
    pub blocked_by: Option<UserId>,
    pub current_version_id: Option<RecipeVersionId>,
    pub created_at: DateTime<Utc>,
}

impl RecipeRecord {
    /// Create a bare recipe awaiting its first version.
    pub async fn create(pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>("INSERT INTO recipes DEFAULT VALUES RETURNING *")
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_id(id: RecipeId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM recipes WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Lock the recipe row inside a transaction. Used by version creation
    /// and the admin block path so their read-modify-write is ordered.
    pub async fn lock_by_id(
        id: RecipeId,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM recipes WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    pub async fn set_blocked(
        id: RecipeId,
        blocked: bool,
        blocked_by: Option<UserId>,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE recipes
             SET is_blocked = $2,
                 blocked_at = CASE WHEN $2 THEN now() ELSE NULL END,
                 blocked_by = CASE WHEN $2 THEN $3 ELSE NULL END
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(blocked)
        .bind(blocked_by)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn set_current_version(
        id: RecipeId,
        version_id: RecipeVersionId,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE recipes SET current_version_id = $2 WHERE id = $1")
            .bind(id)
            .bind(version_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Flat snapshot of the block-related fields, for audit diffing.
    pub fn block_snapshot(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("is_blocked".into(), json!(self.is_blocked));
        map.insert(
            "blocked_at".into(),
            self.blocked_at
                .map(|t| json!(t.to_rfc3339()))
                .unwrap_or(Value::Null),
        );
        map.insert(
            "blocked_by".into(),
            self.blocked_by
                .map(|u| json!(u.to_string()))
                .unwrap_or(Value::Null),
        );
        map
    }
}
