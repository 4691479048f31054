use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::{RecipeVersionId, ShareId, UserId};

/// Public link to a frozen recipe-version snapshot. The slug is the
/// external identifier; the target version reference is nulled when the
/// version is deleted upstream.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct PublicShareRecord {
    pub id: ShareId,
    pub slug: String,
    pub user_id: UserId,
    pub recipe_version_id: Option<RecipeVersionId>,
    pub is_enabled: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PublicShareRecord {
    /// Raw insert; surfaces the sqlx error so the caller can detect a
    /// slug collision and regenerate.
    pub async fn insert(
        slug: &str,
        user_id: UserId,
        recipe_version_id: RecipeVersionId,
        expires_at: Option<DateTime<Utc>>,
        pool: &PgPool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO public_shares (slug, user_id, recipe_version_id, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(slug)
        .bind(user_id)
        .bind(recipe_version_id)
        .bind(expires_at)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_slug(slug: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM public_shares WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_for_user(user_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM public_shares WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Owner-scoped update of the enable flag and expiry.
    pub async fn update_settings(
        user_id: UserId,
        slug: &str,
        is_enabled: Option<bool>,
        expires_at: Option<Option<DateTime<Utc>>>,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE public_shares
             SET is_enabled = COALESCE($3, is_enabled),
                 expires_at = CASE WHEN $4 THEN $5 ELSE expires_at END
             WHERE user_id = $1 AND slug = $2
             RETURNING *",
        )
        .bind(user_id)
        .bind(slug)
        .bind(is_enabled)
        .bind(expires_at.is_some())
        .bind(expires_at.flatten())
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
