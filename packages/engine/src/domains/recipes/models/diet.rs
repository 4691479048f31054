use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::{DietId, RecipeVersionId};

/// Reference diet tag (vegan, gluten-free, ...). Seeded by migration.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct DietRecord {
    pub id: DietId,
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl DietRecord {
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM diets ORDER BY id")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_code(code: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM diets WHERE code = $1")
            .bind(code)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_for_version(
        version_id: RecipeVersionId,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT d.* FROM diets d
             JOIN recipe_diets rd ON rd.diet_id = d.id
             WHERE rd.recipe_version_id = $1
             ORDER BY d.id",
        )
        .bind(version_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
