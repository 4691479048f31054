//! Audit recorder for privileged mutations.
//!
//! `record` takes the caller's open transaction: the audit entry and the
//! mutation it describes commit or roll back together, so the trail never
//! describes a change that did not take effect.

use serde_json::{Map, Value};
use sqlx::{Postgres, Transaction};

use crate::common::UserId;
use crate::domains::audit::diff::diff_snapshots;
use crate::domains::audit::models::admin_audit::AdminAuditRecord;

/// Record a privileged mutation with field-level before/after values.
///
/// Always writes the parent row; writes one child row per differing
/// field. `before == after` yields a parent with zero children.
#[allow(clippy::too_many_arguments)]
pub async fn record(
    tx: &mut Transaction<'_, Postgres>,
    actor_user_id: Option<UserId>,
    target_table: &str,
    target_pk: &str,
    action: &str,
    before: &Map<String, Value>,
    after: &Map<String, Value>,
    reason: Option<&str>,
) -> Result<AdminAuditRecord, sqlx::Error> {
    let audit =
        AdminAuditRecord::insert(actor_user_id, target_table, target_pk, action, reason, tx)
            .await?;

    let changes = diff_snapshots(before, after);
    AdminAuditRecord::insert_field_changes(audit.id, &changes, tx).await?;

    tracing::debug!(
        audit_id = audit.id,
        target = %format!("{}/{}", target_table, target_pk),
        action,
        changed_fields = changes.len(),
        "recorded admin audit entry"
    );

    Ok(audit)
}
