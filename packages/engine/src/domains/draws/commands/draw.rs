//! The draw engine: one randomized recommendation per call, with
//! best-effort exclusion of the user's recent draws.

use sqlx::PgPool;

use crate::common::{DietId, EngineError, RecipeId, RecipeVersionId, SessionId, UserId};
use crate::config::Config;
use crate::domains::draws::models::candidate::DrawCandidate;
use crate::domains::draws::models::draw_history::DrawHistoryRecord;
use crate::domains::draws::selection::{pick_index, seed_from_string, PrepTimeBucket};

/// Caller-supplied eligibility filters.
#[derive(Debug, Clone)]
pub struct DrawFilters {
    pub prep_time_bucket: PrepTimeBucket,
    pub diet_ids: Vec<DietId>,
}

/// Optional draw tuning. `exclude_last = Some(0)` disables recency
/// exclusion; `None` uses the deployment's configured window.
#[derive(Debug, Clone, Default)]
pub struct DrawOptions {
    pub exclude_last: Option<i64>,
    pub seed: Option<String>,
    pub session_id: Option<SessionId>,
}

/// The selected recommendation.
#[derive(Debug, Clone)]
pub struct DrawResult {
    pub recipe_id: RecipeId,
    pub recipe_version_id: RecipeVersionId,
    pub title: String,
    pub image_url: Option<String>,
    pub history_id: i64,
}

/// Draw one eligible current recipe version for the user.
///
/// Takes no locks: concurrent draws by the same user may observe a stale
/// exclusion set, which is acceptable — the contract is best-effort
/// recency de-duplication, not serializability. Every successful draw
/// appends exactly one history row, including on the fallback path.
pub async fn draw(
    user_id: UserId,
    filters: DrawFilters,
    opts: DrawOptions,
    config: &Config,
    pool: &PgPool,
) -> Result<DrawResult, EngineError> {
    let pool_all = DrawCandidate::query_pool(filters.prep_time_bucket, &filters.diet_ids, pool)
        .await?;

    let exclude_last = opts.exclude_last.unwrap_or(config.draw_exclude_last);
    let excluded = DrawHistoryRecord::recent_recipe_ids(user_id, exclude_last, pool).await?;

    let filtered: Vec<&DrawCandidate> = pool_all
        .iter()
        .filter(|c| !excluded.contains(&c.recipe_id))
        .collect();

    // Exclusion emptying the pool degrades to the unexcluded pool rather
    // than starving the user.
    let candidates: Vec<&DrawCandidate> = if filtered.is_empty() {
        if !pool_all.is_empty() {
            tracing::debug!(user_id = %user_id, "exclusion emptied draw pool, falling back");
        }
        pool_all.iter().collect()
    } else {
        filtered
    };

    if candidates.is_empty() {
        return Err(EngineError::NoEligibleRecipes);
    }

    let seed_value = opts.seed.as_deref().map(seed_from_string);
    let chosen = candidates[pick_index(candidates.len(), seed_value)];

    let mut tx = pool.begin().await?;
    let history = DrawHistoryRecord::append(
        user_id,
        chosen.recipe_id,
        chosen.recipe_version_id,
        filters.prep_time_bucket.as_minutes(),
        &filters.diet_ids,
        opts.session_id,
        opts.seed.as_deref(),
        &mut tx,
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        user_id = %user_id,
        recipe_id = %chosen.recipe_id,
        bucket = filters.prep_time_bucket.as_minutes(),
        seeded = opts.seed.is_some(),
        "draw completed"
    );

    Ok(DrawResult {
        recipe_id: chosen.recipe_id,
        recipe_version_id: chosen.recipe_version_id,
        title: chosen.title.clone(),
        image_url: chosen.image_url.clone(),
        history_id: history.id,
    })
}
