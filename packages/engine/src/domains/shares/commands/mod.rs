//! Share resolver: public slugs mapped to frozen version snapshots.

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::PgPool;

use crate::common::{EngineError, RecipeVersionId, UserId};
use crate::config::Config;
use crate::domains::recipes::models::recipe_version::RecipeVersionRecord;
use crate::domains::shares::models::public_share::PublicShareRecord;

const SLUG_LENGTH: usize = 10;

/// A successfully resolved share: the share row plus the frozen snapshot
/// it points at.
#[derive(Debug, Clone)]
pub struct ResolvedShare {
    pub share: PublicShareRecord,
    pub version: RecipeVersionRecord,
}

/// Resolve a public slug.
///
/// Check order matters: a disabled share reports `Disabled` even when it
/// is also expired, and the target is always fetched by id — the share
/// keeps resolving to the same snapshot after the recipe is edited. A
/// nulled target (version deleted upstream) is `NotFound`.
pub async fn resolve(slug: &str, pool: &PgPool) -> Result<ResolvedShare, EngineError> {
    let share = PublicShareRecord::find_by_slug(slug, pool)
        .await?
        .ok_or(EngineError::NotFound)?;

    if !share.is_enabled {
        return Err(EngineError::Disabled);
    }
    if let Some(expires_at) = share.expires_at {
        if expires_at <= Utc::now() {
            return Err(EngineError::Expired);
        }
    }

    let version_id = share.recipe_version_id.ok_or(EngineError::NotFound)?;
    let version = RecipeVersionRecord::find_by_id(version_id, pool)
        .await?
        .ok_or(EngineError::NotFound)?;

    Ok(ResolvedShare { share, version })
}

/// Create a share for a specific version snapshot. Slug generation
/// retries on collision up to the configured attempt bound and then
/// fails with `Conflict` rather than blocking.
pub async fn create_share(
    user_id: UserId,
    recipe_version_id: RecipeVersionId,
    expires_at: Option<DateTime<Utc>>,
    config: &Config,
    pool: &PgPool,
) -> Result<PublicShareRecord, EngineError> {
    if RecipeVersionRecord::find_by_id(recipe_version_id, pool)
        .await?
        .is_none()
    {
        return Err(EngineError::NotFound);
    }

    for _ in 0..config.share_slug_attempts {
        let slug = generate_slug();
        match PublicShareRecord::insert(&slug, user_id, recipe_version_id, expires_at, pool).await
        {
            Ok(share) => {
                tracing::info!(user_id = %user_id, slug = %share.slug, "public share created");
                return Ok(share);
            }
            Err(e) if EngineError::is_unique_violation(&e) => {
                tracing::debug!(slug, "share slug collision, regenerating");
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(EngineError::Conflict(format!(
        "could not allocate a unique share slug in {} attempts",
        config.share_slug_attempts
    )))
}

/// Owner-scoped update of enable state and expiry.
pub async fn update_share(
    user_id: UserId,
    slug: &str,
    is_enabled: Option<bool>,
    expires_at: Option<Option<DateTime<Utc>>>,
    pool: &PgPool,
) -> Result<PublicShareRecord, EngineError> {
    PublicShareRecord::update_settings(user_id, slug, is_enabled, expires_at, pool)
        .await?
        .ok_or(EngineError::NotFound)
}

fn generate_slug() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SLUG_LENGTH)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect()
}
