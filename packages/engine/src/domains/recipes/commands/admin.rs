//! Admin mutations on recipes and versions. Every path here routes
//! through the audit recorder inside the mutation's own transaction.

use sqlx::PgPool;

use crate::common::{EngineError, RecipeId, RecipeVersionId, UserId};
use crate::domains::audit::recorder;
use crate::domains::recipes::models::recipe::RecipeRecord;
use crate::domains::recipes::models::recipe_version::RecipeVersionRecord;

/// Block or unblock a recipe. Blocked recipes drop out of draw pools and
/// daily picks but keep their version history.
pub async fn block_recipe(
    actor: UserId,
    recipe_id: RecipeId,
    blocked: bool,
    reason: Option<&str>,
    pool: &PgPool,
) -> Result<RecipeRecord, EngineError> {
    let mut tx = pool.begin().await?;

    let recipe = RecipeRecord::lock_by_id(recipe_id, &mut tx)
        .await?
        .ok_or(EngineError::NotFound)?;
    let before = recipe.block_snapshot();

    let updated = RecipeRecord::set_blocked(recipe_id, blocked, Some(actor), &mut tx).await?;
    let after = updated.block_snapshot();

    let action = if blocked { "block" } else { "unblock" };
    recorder::record(
        &mut tx,
        Some(actor),
        "recipes",
        &recipe_id.to_string(),
        action,
        &before,
        &after,
        reason,
    )
    .await?;

    tx.commit().await?;

    tracing::info!(recipe_id = %recipe_id, blocked, "recipe block state changed");
    Ok(updated)
}

/// Correct prep time or quality score on an existing version without
/// creating a new one. Metadata fixes only; content edits go through the
/// version store.
pub async fn update_version_admin(
    actor: UserId,
    version_id: RecipeVersionId,
    prep_time_estimate: Option<i16>,
    quality_score: Option<i16>,
    reason: Option<&str>,
    pool: &PgPool,
) -> Result<RecipeVersionRecord, EngineError> {
    if let Some(score) = quality_score {
        if !(0..=100).contains(&score) {
            return Err(EngineError::Validation(format!(
                "quality_score must be between 0 and 100, got {}",
                score
            )));
        }
    }
    if let Some(prep) = prep_time_estimate {
        if prep < 0 {
            return Err(EngineError::Validation(
                "prep_time_estimate must not be negative".into(),
            ));
        }
    }

    let mut tx = pool.begin().await?;

    let current: Option<RecipeVersionRecord> =
        sqlx::query_as("SELECT * FROM recipe_versions WHERE id = $1 FOR UPDATE")
            .bind(version_id)
            .fetch_optional(&mut *tx)
            .await?;
    let current = current.ok_or(EngineError::NotFound)?;
    let before = current.admin_snapshot();

    let updated = RecipeVersionRecord::update_admin_fields(
        version_id,
        prep_time_estimate,
        quality_score,
        &mut tx,
    )
    .await?;
    let after = updated.admin_snapshot();

    recorder::record(
        &mut tx,
        Some(actor),
        "recipe_versions",
        &version_id.to_string(),
        "update_metadata",
        &before,
        &after,
        reason,
    )
    .await?;

    tx.commit().await?;
    Ok(updated)
}
