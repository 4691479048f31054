//! Moderation workflow commands. Reports start at `pending`; admins move
//! them one-way through `reviewing` into `resolved` or `dismissed`.

use sqlx::PgPool;

use crate::common::{ContentReportId, EngineError, RecipeId, UserId};
use crate::domains::audit::recorder;
use crate::domains::moderation::models::content_report::ContentReportRecord;
use crate::domains::moderation::models::report_category::ReportCategoryRecord;
use crate::domains::moderation::models::report_status::{ReportStatusCode, ReportStatusRecord};

/// File a new report against a recipe. Always enters at `pending`.
pub async fn create_report(
    reported_by: Option<UserId>,
    recipe_id: RecipeId,
    category_id: i16,
    comment: Option<&str>,
    pool: &PgPool,
) -> Result<ContentReportRecord, EngineError> {
    if ReportCategoryRecord::find_by_id(category_id, pool)
        .await?
        .is_none()
    {
        return Err(EngineError::Validation(format!(
            "unknown report category {}",
            category_id
        )));
    }

    let pending = ReportStatusRecord::find_by_code(ReportStatusCode::Pending, pool).await?;
    let report = ContentReportRecord::create(
        reported_by,
        recipe_id,
        category_id,
        pending.id,
        comment,
        pool,
    )
    .await
    .map_err(EngineError::from_fetch)?;

    tracing::info!(report_id = report.id, recipe_id = %recipe_id, "content report created");
    Ok(report)
}

/// Admin-only status transition, audited in the same transaction.
///
/// Entering a terminal state sets `processed_by` and `processed_at`
/// atomically with the status change. Transitions out of a terminal
/// state, or any move the state machine does not allow, fail with
/// `InvalidTransition`.
pub async fn transition_report(
    report_id: ContentReportId,
    admin: UserId,
    new_status: ReportStatusCode,
    reason: Option<&str>,
    pool: &PgPool,
) -> Result<ContentReportRecord, EngineError> {
    let new_status_row = ReportStatusRecord::find_by_code(new_status, pool).await?;

    let mut tx = pool.begin().await?;

    let report = ContentReportRecord::lock_by_id(report_id, &mut tx)
        .await?
        .ok_or(EngineError::NotFound)?;

    let current_code: String =
        sqlx::query_scalar("SELECT code FROM report_statuses WHERE id = $1")
            .bind(report.status_id)
            .fetch_one(&mut *tx)
            .await?;
    let current = ReportStatusCode::from_code(&current_code)?;

    if !current.can_transition_to(new_status) {
        return Err(EngineError::InvalidTransition {
            from: current.to_string(),
            to: new_status.to_string(),
        });
    }

    let before = report.workflow_snapshot(current.as_code());

    let updated = ContentReportRecord::apply_transition(
        report_id,
        new_status_row.id,
        Some(admin),
        new_status.is_terminal(),
        &mut tx,
    )
    .await?;

    let after = updated.workflow_snapshot(new_status.as_code());

    recorder::record(
        &mut tx,
        Some(admin),
        "content_reports",
        &report_id.to_string(),
        "transition",
        &before,
        &after,
        reason,
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        report_id,
        from = %current,
        to = %new_status,
        "report transitioned"
    );

    Ok(updated)
}
