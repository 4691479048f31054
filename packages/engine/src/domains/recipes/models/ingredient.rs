use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::common::{IngredientId, RecipeVersionId};

use super::recipe_version::{normalize_title, NewIngredientLine};

/// Normalized ingredient dictionary entry. Names are unique case-insensitively.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct IngredientRecord {
    pub id: IngredientId,
    pub name: String,
    pub name_normalized: String,
    pub created_at: DateTime<Utc>,
}

/// One row of a version's ingredient list, ordered by `position`.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct RecipeIngredientRecord {
    pub id: i64,
    pub recipe_version_id: RecipeVersionId,
    pub ingredient_id: IngredientId,
    pub position: i16,
    pub measure: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
}

impl IngredientRecord {
    /// Resolve an ingredient by name, creating it if absent.
    ///
    /// The upsert arbitrates on the normalized-name index so diacritic
    /// and case variants ("Crème Brûlée", "creme brulee") converge on
    /// one row. Equal `lower(name)` implies equal normalized name, so
    /// this arbiter also covers the plain-name index; the first spelling
    /// written wins.
    pub async fn find_or_create(
        name: &str,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Self, sqlx::Error> {
        let normalized = normalize_title(name);
        sqlx::query_as::<_, Self>(
            "INSERT INTO ingredients (name, name_normalized)
             VALUES ($1, $2)
             ON CONFLICT ((lower(name_normalized)))
                 DO UPDATE SET name_normalized = ingredients.name_normalized
             RETURNING *",
        )
        .bind(name.trim())
        .bind(normalized)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn find_by_name(name: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM ingredients WHERE lower(name) = lower($1)")
            .bind(name.trim())
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }
}

impl RecipeIngredientRecord {
    /// Attach the ingredient lines of a new version, positions assigned
    /// from the caller's ordering.
    pub async fn insert_lines(
        version_id: RecipeVersionId,
        lines: &[NewIngredientLine],
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<(), sqlx::Error> {
        for (idx, line) in lines.iter().enumerate() {
            let ingredient = IngredientRecord::find_or_create(&line.name, tx).await?;
            sqlx::query(
                "INSERT INTO recipe_ingredients
                     (recipe_version_id, ingredient_id, position, measure, quantity, unit)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(version_id)
            .bind(ingredient.id)
            .bind(idx as i16)
            .bind(&line.measure)
            .bind(line.quantity)
            .bind(&line.unit)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    pub async fn find_for_version(
        version_id: RecipeVersionId,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM recipe_ingredients WHERE recipe_version_id = $1 ORDER BY position",
        )
        .bind(version_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
