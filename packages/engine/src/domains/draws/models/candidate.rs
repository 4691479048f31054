use anyhow::Result;
use sqlx::PgPool;

use crate::common::{DietId, RecipeId, RecipeVersionId};
use crate::domains::draws::selection::PrepTimeBucket;

/// A current recipe version eligible for drawing.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct DrawCandidate {
    pub recipe_id: RecipeId,
    pub recipe_version_id: RecipeVersionId,
    pub title: String,
    pub image_url: Option<String>,
}

impl DrawCandidate {
    /// Candidate pool: current versions of unblocked recipes whose prep
    /// time falls in the bucket and that carry every requested diet tag.
    /// Ordered by recipe id so seeded indexing is stable regardless of
    /// storage-layer ordering.
    pub async fn query_pool(
        bucket: PrepTimeBucket,
        diet_ids: &[DietId],
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let (lower, upper) = bucket.bounds();
        sqlx::query_as::<_, Self>(
            "SELECT r.id AS recipe_id, rv.id AS recipe_version_id, rv.title, rv.image_url
             FROM recipe_versions rv
             JOIN recipes r ON r.id = rv.recipe_id
             WHERE rv.is_current
               AND NOT r.is_blocked
               AND rv.prep_time_estimate IS NOT NULL
               AND rv.prep_time_estimate > $1
               AND ($2::smallint IS NULL OR rv.prep_time_estimate <= $2)
               AND (cardinality($3::smallint[]) = 0
                    OR (SELECT count(*) FROM recipe_diets rd
                        WHERE rd.recipe_version_id = rv.id
                          AND rd.diet_id = ANY($3::smallint[])) = cardinality($3::smallint[]))
             ORDER BY r.id",
        )
        .bind(lower)
        .bind(upper)
        .bind(diet_ids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
