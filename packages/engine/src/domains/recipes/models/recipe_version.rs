use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sqlx::{PgPool, Postgres, Transaction};

use crate::common::{DietId, RecipeId, RecipeVersionId};

/// Immutable content snapshot of a recipe.
///
/// For one recipe, exactly one row is current (`valid_to IS NULL`) and the
/// `[valid_from, valid_to)` intervals tile time without gaps or overlaps,
/// ordered by `version`. Only the version-store commands flip `is_current`
/// or write `valid_to`.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct RecipeVersionRecord {
    pub id: RecipeVersionId,
    pub recipe_id: RecipeId,
    pub version: i32,
    pub title: String,
    pub title_normalized: String,
    pub instructions: Option<String>,
    pub image_url: Option<String>,
    pub prep_time_estimate: Option<i16>,
    pub quality_score: Option<i16>,
    pub source: String,
    pub source_id: Option<String>,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
}

/// One ingredient line of a new version, in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIngredientLine {
    pub name: String,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub measure: Option<String>,
}

/// Content for a new version, supplied by callers of `create_version`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVersionContent {
    pub title: String,
    pub instructions: Option<String>,
    pub image_url: Option<String>,
    pub prep_time_estimate: Option<i16>,
    pub quality_score: Option<i16>,
    pub source: String,
    pub source_id: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<NewIngredientLine>,
    #[serde(default)]
    pub diet_ids: Vec<DietId>,
}

impl RecipeVersionRecord {
    pub async fn find_by_id(id: RecipeVersionId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM recipe_versions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_current(recipe_id: RecipeId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM recipe_versions WHERE recipe_id = $1 AND is_current",
        )
        .bind(recipe_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Version whose `[valid_from, valid_to)` interval contains `at`.
    pub async fn find_as_of(
        recipe_id: RecipeId,
        at: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM recipe_versions
             WHERE recipe_id = $1
               AND valid_from <= $2
               AND (valid_to IS NULL OR valid_to > $2)",
        )
        .bind(recipe_id)
        .bind(at)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// All versions of a recipe ordered by version number. Used by the
    /// tiling-invariant tests and admin views.
    pub async fn find_all_for_recipe(recipe_id: RecipeId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM recipe_versions WHERE recipe_id = $1 ORDER BY version",
        )
        .bind(recipe_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn next_version_number(
        recipe_id: RecipeId,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<i32, sqlx::Error> {
        let next: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(version), 0) + 1 FROM recipe_versions WHERE recipe_id = $1",
        )
        .bind(recipe_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(next)
    }

    /// Close the open interval of the current version, if any.
    pub async fn close_current(
        recipe_id: RecipeId,
        at: DateTime<Utc>,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<RecipeVersionId>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE recipe_versions
             SET is_current = false, valid_to = $2
             WHERE recipe_id = $1 AND is_current
             RETURNING id",
        )
        .bind(recipe_id)
        .bind(at)
        .fetch_optional(&mut **tx)
        .await
    }

    pub async fn insert(
        recipe_id: RecipeId,
        version: i32,
        content: &NewVersionContent,
        title_normalized: &str,
        valid_from: DateTime<Utc>,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO recipe_versions
                 (recipe_id, version, title, title_normalized, instructions, image_url,
                  prep_time_estimate, quality_score, source, source_id, valid_from)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *",
        )
        .bind(recipe_id)
        .bind(version)
        .bind(&content.title)
        .bind(title_normalized)
        .bind(&content.instructions)
        .bind(&content.image_url)
        .bind(content.prep_time_estimate)
        .bind(content.quality_score)
        .bind(&content.source)
        .bind(&content.source_id)
        .bind(valid_from)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn tag_diets(
        version_id: RecipeVersionId,
        diet_ids: &[DietId],
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<(), sqlx::Error> {
        for diet_id in diet_ids {
            sqlx::query(
                "INSERT INTO recipe_diets (recipe_version_id, diet_id) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(version_id)
            .bind(diet_id)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    pub async fn update_admin_fields(
        id: RecipeVersionId,
        prep_time_estimate: Option<i16>,
        quality_score: Option<i16>,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE recipe_versions
             SET prep_time_estimate = COALESCE($2, prep_time_estimate),
                 quality_score = COALESCE($3, quality_score)
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(prep_time_estimate)
        .bind(quality_score)
        .fetch_one(&mut **tx)
        .await
    }

    /// Flat snapshot of the admin-editable fields, for audit diffing.
    pub fn admin_snapshot(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            "prep_time_estimate".into(),
            self.prep_time_estimate.map(|v| json!(v)).unwrap_or(Value::Null),
        );
        map.insert(
            "quality_score".into(),
            self.quality_score.map(|v| json!(v)).unwrap_or(Value::Null),
        );
        map
    }
}

/// Case-fold and strip combining diacritics for lookup.
///
/// Covers the Latin-1/Latin Extended-A range, which is what recipe titles
/// in the catalogue actually use; anything outside it is lowercased as-is.
pub fn normalize_title(title: &str) -> String {
    title
        .trim()
        .chars()
        .flat_map(|c| c.to_lowercase())
        .map(fold_diacritic)
        .collect()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'è' | 'é' | 'ê' | 'ë' | 'ę' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ł' => 'l',
        'ñ' | 'ń' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'ż' | 'ź' | 'ž' => 'z',
        'ß' => 's',
        'š' | 'ś' => 's',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_title;

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize_title("  Chicken Soup "), "chicken soup");
    }

    #[test]
    fn normalize_folds_diacritics() {
        assert_eq!(normalize_title("Żurek Śląski"), "zurek slaski");
        assert_eq!(normalize_title("Crème Brûlée"), "creme brulee");
    }

    #[test]
    fn normalize_leaves_unknown_chars() {
        assert_eq!(normalize_title("Pho 123"), "pho 123");
    }
}
