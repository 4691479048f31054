//! Daily pick scheduler: one deterministic recommendation per user per
//! calendar date, computed from the user's stored default filters.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::common::{EngineError, UserId};
use crate::config::Config;
use crate::domains::draws::models::candidate::DrawCandidate;
use crate::domains::draws::models::daily_pick::DailyPickRecord;
use crate::domains::draws::models::draw_history::DrawHistoryRecord;
use crate::domains::draws::selection::{
    daily_seed_string, pick_index, seed_from_string, PrepTimeBucket,
};
use crate::domains::member::models::profile::ProfileRecord;

/// Return the existing pick for (user, date) or compute and insert one.
///
/// The selection seed is derived from (user, date), so concurrent first
/// requests compute the same candidate without a lock; the insert race is
/// settled by the unique constraint, and the loser re-reads the winner's
/// row. When the pool is empty no row is written and the next request
/// retries.
///
/// A freshly created pick also appends to the draw-history log (winner
/// only, in the same transaction), so it counts toward the recency
/// exclusion of later draws like any other recommendation.
pub async fn get_or_create_daily_pick(
    user_id: UserId,
    date: NaiveDate,
    config: &Config,
    pool: &PgPool,
) -> Result<DailyPickRecord, EngineError> {
    if let Some(existing) = DailyPickRecord::find_by_user_date(user_id, date, pool).await? {
        return Ok(existing);
    }

    // Stored defaults; users without a profile fall back to the
    // configured bucket with no diet filter.
    let (bucket, diet_ids) = match ProfileRecord::find_by_user(user_id, pool).await? {
        Some(profile) => (
            PrepTimeBucket::from_minutes(profile.default_prep_time_bucket)?,
            ProfileRecord::diet_ids(user_id, pool).await?,
        ),
        None => (
            PrepTimeBucket::from_minutes(config.daily_pick_fallback_bucket)?,
            Vec::new(),
        ),
    };

    let candidates = DrawCandidate::query_pool(bucket, &diet_ids, pool).await?;
    if candidates.is_empty() {
        return Err(EngineError::NoEligibleRecipes);
    }

    let seed_string = daily_seed_string(user_id, date);
    let seed = seed_from_string(&seed_string);
    let chosen = &candidates[pick_index(candidates.len(), Some(seed))];

    let mut tx = pool.begin().await?;
    match DailyPickRecord::insert(
        user_id,
        date,
        chosen.recipe_id,
        chosen.recipe_version_id,
        &mut tx,
    )
    .await
    {
        Ok(pick) => {
            DrawHistoryRecord::append(
                user_id,
                chosen.recipe_id,
                chosen.recipe_version_id,
                bucket.as_minutes(),
                &diet_ids,
                None,
                Some(&seed_string),
                &mut tx,
            )
            .await?;
            tx.commit().await?;

            tracing::info!(user_id = %user_id, %date, recipe_id = %chosen.recipe_id, "daily pick created");
            Ok(pick)
        }
        Err(e) if EngineError::is_unique_violation(&e) => {
            // Lost the insert race; the winner's row is the pick.
            drop(tx);
            DailyPickRecord::find_by_user_date(user_id, date, pool)
                .await?
                .ok_or(EngineError::NotFound)
        }
        Err(e) => Err(e.into()),
    }
}
