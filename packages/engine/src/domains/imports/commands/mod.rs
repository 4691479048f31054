//! Import batch reporting for the external ETL collaborator.
//!
//! Imported content goes through the same version-store operations as
//! any other write; this module only tracks batch progress and
//! per-record outcomes.

use sqlx::PgPool;

use crate::common::{EngineError, ImportBatchId, RecipeId, RecipeVersionId};
use crate::domains::imports::models::import_batch::ImportBatchRecord;
use crate::domains::imports::models::source_record::SourceRecordRecord;

/// Outcome of processing one external record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Inserted,
    Updated,
    Skipped,
    Error,
}

impl RecordOutcome {
    fn operation(self) -> &'static str {
        match self {
            Self::Inserted => "inserted",
            Self::Updated => "updated",
            Self::Skipped => "skipped",
            Self::Error => "error",
        }
    }

    fn counter_column(self) -> &'static str {
        match self {
            Self::Inserted => "inserted_count",
            Self::Updated => "updated_count",
            Self::Skipped => "skipped_count",
            Self::Error => "error_count",
        }
    }
}

/// Open a new batch in `running` state.
pub async fn start_batch(
    source_name: &str,
    external_batch_id: Option<&str>,
    pool: &PgPool,
) -> Result<ImportBatchRecord, EngineError> {
    ImportBatchRecord::start(source_name, external_batch_id, pool)
        .await
        .map_err(|e| {
            if EngineError::is_unique_violation(&e) {
                EngineError::Conflict(format!(
                    "external batch id {:?} already registered",
                    external_batch_id
                ))
            } else {
                e.into()
            }
        })
}

/// Record one per-record outcome and bump the batch counter in the same
/// transaction.
#[allow(clippy::too_many_arguments)]
pub async fn record_outcome(
    batch_id: ImportBatchId,
    source_name: &str,
    external_id: &str,
    outcome: RecordOutcome,
    recipe_id: Option<RecipeId>,
    recipe_version_id: Option<RecipeVersionId>,
    title_raw: Option<&str>,
    title_normalized: Option<&str>,
    pool: &PgPool,
) -> Result<SourceRecordRecord, EngineError> {
    let mut tx = pool.begin().await?;

    let batch_exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM import_batches WHERE id = $1)")
            .bind(batch_id)
            .fetch_one(&mut *tx)
            .await?;
    if !batch_exists {
        return Err(EngineError::NotFound);
    }

    let record = SourceRecordRecord::upsert(
        batch_id,
        source_name,
        external_id,
        recipe_id,
        recipe_version_id,
        outcome.operation(),
        title_raw,
        title_normalized,
        &mut tx,
    )
    .await?;

    // Column name comes from the enum, not caller input.
    let bump = format!(
        "UPDATE import_batches SET {col} = {col} + 1 WHERE id = $1",
        col = outcome.counter_column()
    );
    sqlx::query(&bump).bind(batch_id).execute(&mut *tx).await?;

    tx.commit().await?;
    Ok(record)
}

/// Close a batch with a final status.
pub async fn complete_batch(
    batch_id: ImportBatchId,
    status: &str,
    pool: &PgPool,
) -> Result<ImportBatchRecord, EngineError> {
    ImportBatchRecord::complete(batch_id, status, pool)
        .await?
        .ok_or(EngineError::NotFound)
}
