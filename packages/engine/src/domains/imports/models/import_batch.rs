use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::ImportBatchId;

/// Progress of one external import batch. The ETL collaborator drives
/// these rows; the engine only records what it reports.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct ImportBatchRecord {
    pub id: ImportBatchId,
    pub source_name: String,
    pub external_batch_id: Option<String>,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub inserted_count: i32,
    pub updated_count: i32,
    pub skipped_count: i32,
    pub error_count: i32,
}

impl ImportBatchRecord {
    pub async fn start(
        source_name: &str,
        external_batch_id: Option<&str>,
        pool: &PgPool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO import_batches (source_name, external_batch_id)
             VALUES ($1, $2)
             RETURNING *",
        )
        .bind(source_name)
        .bind(external_batch_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(id: ImportBatchId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM import_batches WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn complete(
        id: ImportBatchId,
        status: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE import_batches
             SET status = $2, completed_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
