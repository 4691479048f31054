use anyhow::Result;
use sqlx::PgPool;

/// Reference row for a report category, seeded by migration.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct ReportCategoryRecord {
    pub id: i16,
    pub code: String,
    pub name: String,
}

impl ReportCategoryRecord {
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM report_categories ORDER BY id")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_id(id: i16, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM report_categories WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_code(code: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM report_categories WHERE code = $1")
            .bind(code)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }
}
