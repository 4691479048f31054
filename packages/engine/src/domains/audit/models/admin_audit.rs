use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::common::{AdminAuditId, UserId};
use crate::domains::audit::diff::FieldChange;

/// One audit row per privileged mutation. Never updated or deleted.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct AdminAuditRecord {
    pub id: AdminAuditId,
    pub actor_user_id: Option<UserId>,
    pub target_table: String,
    pub target_pk: String,
    pub action: String,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Before/after value of one column touched by an audited mutation.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct AdminAuditFieldChangeRecord {
    pub id: i64,
    pub audit_id: AdminAuditId,
    pub column_name: String,
    pub before_value: Option<String>,
    pub after_value: Option<String>,
}

impl AdminAuditRecord {
    pub async fn insert(
        actor_user_id: Option<UserId>,
        target_table: &str,
        target_pk: &str,
        action: &str,
        reason: Option<&str>,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO admin_audit (actor_user_id, target_table, target_pk, action, reason)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(actor_user_id)
        .bind(target_table)
        .bind(target_pk)
        .bind(action)
        .bind(reason)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn insert_field_changes(
        audit_id: AdminAuditId,
        changes: &[FieldChange],
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<(), sqlx::Error> {
        for change in changes {
            sqlx::query(
                "INSERT INTO admin_audit_field_changes
                     (audit_id, column_name, before_value, after_value)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(audit_id)
            .bind(&change.column)
            .bind(&change.before)
            .bind(&change.after)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    pub async fn find_for_target(
        target_table: &str,
        target_pk: &str,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM admin_audit
             WHERE target_table = $1 AND target_pk = $2
             ORDER BY created_at DESC, id DESC",
        )
        .bind(target_table)
        .bind(target_pk)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_changes(
        audit_id: AdminAuditId,
        pool: &PgPool,
    ) -> Result<Vec<AdminAuditFieldChangeRecord>> {
        sqlx::query_as::<_, AdminAuditFieldChangeRecord>(
            "SELECT * FROM admin_audit_field_changes WHERE audit_id = $1 ORDER BY column_name",
        )
        .bind(audit_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
