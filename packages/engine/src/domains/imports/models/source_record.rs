use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::common::{ImportBatchId, RecipeId, RecipeVersionId};

/// Per-record outcome of an import batch, keyed by (source, external id)
/// so re-imports of the same record upsert rather than duplicate.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct SourceRecordRecord {
    pub id: i64,
    pub batch_id: ImportBatchId,
    pub source_name: String,
    pub external_id: String,
    pub recipe_id: Option<RecipeId>,
    pub recipe_version_id: Option<RecipeVersionId>,
    pub operation: String,
    pub title_raw: Option<String>,
    pub title_normalized: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SourceRecordRecord {
    #[allow(clippy::too_many_arguments)]
    pub async fn upsert(
        batch_id: ImportBatchId,
        source_name: &str,
        external_id: &str,
        recipe_id: Option<RecipeId>,
        recipe_version_id: Option<RecipeVersionId>,
        operation: &str,
        title_raw: Option<&str>,
        title_normalized: Option<&str>,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO source_records
                 (batch_id, source_name, external_id, recipe_id, recipe_version_id,
                  operation, title_raw, title_normalized)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (source_name, external_id) DO UPDATE SET
                 batch_id = EXCLUDED.batch_id,
                 recipe_id = EXCLUDED.recipe_id,
                 recipe_version_id = EXCLUDED.recipe_version_id,
                 operation = EXCLUDED.operation,
                 title_raw = EXCLUDED.title_raw,
                 title_normalized = EXCLUDED.title_normalized
             RETURNING *",
        )
        .bind(batch_id)
        .bind(source_name)
        .bind(external_id)
        .bind(recipe_id)
        .bind(recipe_version_id)
        .bind(operation)
        .bind(title_raw)
        .bind(title_normalized)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn find_for_batch(batch_id: ImportBatchId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM source_records WHERE batch_id = $1 ORDER BY id",
        )
        .bind(batch_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
