//! Version-store operations: the only code path allowed to flip
//! `is_current`, write `valid_to`, or repoint `recipes.current_version_id`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::{EngineError, RecipeId};
use crate::domains::recipes::models::ingredient::RecipeIngredientRecord;
use crate::domains::recipes::models::recipe::RecipeRecord;
use crate::domains::recipes::models::recipe_version::{
    normalize_title, NewVersionContent, RecipeVersionRecord,
};

/// Create the next version of a recipe and make it current.
///
/// Closing the previous current interval, opening the new one and
/// repointing the recipe happen in one transaction; a partially applied
/// transition would break the tiling invariant. A unique violation on
/// (recipe_id, version) means another caller allocated the same number
/// concurrently and surfaces as `Conflict`; retrying picks up a fresh
/// number.
pub async fn create_version(
    recipe_id: RecipeId,
    content: NewVersionContent,
    pool: &PgPool,
) -> Result<RecipeVersionRecord, EngineError> {
    validate_content(&content)?;

    let mut tx = pool.begin().await?;

    if RecipeRecord::lock_by_id(recipe_id, &mut tx).await?.is_none() {
        return Err(EngineError::NotFound);
    }

    let now = Utc::now();
    let next = RecipeVersionRecord::next_version_number(recipe_id, &mut tx).await?;

    // Same timestamp closes the old interval and opens the new one, so
    // prev.valid_to == next.valid_from.
    RecipeVersionRecord::close_current(recipe_id, now, &mut tx).await?;

    let title_normalized = normalize_title(&content.title);
    let version =
        RecipeVersionRecord::insert(recipe_id, next, &content, &title_normalized, now, &mut tx)
            .await
            .map_err(|e| {
                if EngineError::is_unique_violation(&e) {
                    EngineError::Conflict(format!(
                        "version {} of recipe {} already exists",
                        next, recipe_id
                    ))
                } else {
                    e.into()
                }
            })?;

    RecipeIngredientRecord::insert_lines(version.id, &content.ingredients, &mut tx).await?;
    RecipeVersionRecord::tag_diets(version.id, &content.diet_ids, &mut tx).await?;
    RecipeRecord::set_current_version(recipe_id, version.id, &mut tx).await?;

    tx.commit().await?;

    tracing::info!(
        recipe_id = %recipe_id,
        version = version.version,
        "created recipe version"
    );

    Ok(version)
}

/// Current version of a recipe, `NotFound` if it has none yet.
pub async fn get_current(
    recipe_id: RecipeId,
    pool: &PgPool,
) -> Result<RecipeVersionRecord, EngineError> {
    RecipeVersionRecord::find_current(recipe_id, pool)
        .await?
        .ok_or(EngineError::NotFound)
}

/// Version whose validity interval contains `at`.
///
/// `NotFound` here means the recipe had no version at that instant, which
/// is distinct from "the version was later superseded" — superseded
/// versions still resolve for timestamps inside their interval.
pub async fn get_as_of(
    recipe_id: RecipeId,
    at: DateTime<Utc>,
    pool: &PgPool,
) -> Result<RecipeVersionRecord, EngineError> {
    RecipeVersionRecord::find_as_of(recipe_id, at, pool)
        .await?
        .ok_or(EngineError::NotFound)
}

fn validate_content(content: &NewVersionContent) -> Result<(), EngineError> {
    if content.title.trim().is_empty() {
        return Err(EngineError::Validation("title must not be empty".into()));
    }
    if let Some(score) = content.quality_score {
        if !(0..=100).contains(&score) {
            return Err(EngineError::Validation(format!(
                "quality_score must be between 0 and 100, got {}",
                score
            )));
        }
    }
    if let Some(prep) = content.prep_time_estimate {
        if prep < 0 {
            return Err(EngineError::Validation(
                "prep_time_estimate must not be negative".into(),
            ));
        }
    }
    Ok(())
}
