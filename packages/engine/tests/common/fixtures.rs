//! Shared fixtures for the integration tests.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tokio::sync::Mutex;

use engine_core::common::{DietId, RecipeId, UserId};
use engine_core::config::{
    Config, DEFAULT_DAILY_PICK_FALLBACK_BUCKET, DEFAULT_DRAW_EXCLUDE_LAST,
    DEFAULT_DRAW_HISTORY_TTL_DAYS, DEFAULT_SHARE_SLUG_ATTEMPTS,
};
use engine_core::domains::member::ProfileRecord;
use engine_core::domains::recipes::commands::version_store;
use engine_core::domains::recipes::models::diet::DietRecord;
use engine_core::domains::recipes::models::recipe::RecipeRecord;
use engine_core::domains::recipes::models::recipe_version::{
    NewIngredientLine, NewVersionContent, RecipeVersionRecord,
};

/// Engine config with the stock defaults; tests tweak fields as needed.
pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        draw_exclude_last: DEFAULT_DRAW_EXCLUDE_LAST,
        draw_history_ttl_days: DEFAULT_DRAW_HISTORY_TTL_DAYS,
        share_slug_attempts: DEFAULT_SHARE_SLUG_ATTEMPTS,
        daily_pick_fallback_bucket: DEFAULT_DAILY_PICK_FALLBACK_BUCKET,
    }
}

/// Serializes tests that assert over the whole candidate pool. Tests in
/// one binary share a database, so anything that truncates the catalogue
/// or depends on exact pool contents must hold this while it runs.
pub fn catalogue_lock() -> &'static Mutex<()> {
    static LOCK: Mutex<()> = Mutex::const_new(());
    &LOCK
}

/// Remove all engine rows so pool-sensitive tests start from a known
/// state. Reference tables (diets, report categories and statuses) keep
/// their migration seeds.
pub async fn clear_engine_tables(pool: &PgPool) {
    sqlx::query(
        "TRUNCATE recipes, ingredients, draw_history, daily_picks, public_shares,
                  content_reports, admin_audit, import_batches, profiles CASCADE",
    )
    .execute(pool)
    .await
    .expect("failed to truncate engine tables");
}

pub async fn diet_id(code: &str, pool: &PgPool) -> DietId {
    DietRecord::find_by_code(code, pool)
        .await
        .expect("diet lookup failed")
        .unwrap_or_else(|| panic!("diet '{}' not seeded", code))
        .id
}

pub fn version_content(title: &str, prep: i16, diet_ids: Vec<DietId>) -> NewVersionContent {
    NewVersionContent {
        title: title.to_string(),
        instructions: Some("Combine everything and cook until done.".to_string()),
        image_url: None,
        prep_time_estimate: Some(prep),
        quality_score: Some(75),
        source: "test".to_string(),
        source_id: None,
        ingredients: vec![],
        diet_ids,
    }
}

pub fn ingredient_line(name: &str) -> NewIngredientLine {
    NewIngredientLine {
        name: name.to_string(),
        quantity: Some(Decimal::new(25, 1)),
        unit: Some("cup".to_string()),
        measure: Some("2.5 cups".to_string()),
    }
}

/// Create a recipe with a single version and return both.
pub async fn seed_recipe(
    title: &str,
    prep: i16,
    diet_ids: Vec<DietId>,
    pool: &PgPool,
) -> (RecipeId, RecipeVersionRecord) {
    let recipe = RecipeRecord::create(pool)
        .await
        .expect("failed to create recipe");
    let version =
        version_store::create_version(recipe.id, version_content(title, prep, diet_ids), pool)
            .await
            .expect("failed to create first version");
    (recipe.id, version)
}

/// Create a user profile with the given draw defaults.
pub async fn seed_profile(bucket: i16, diet_codes: &[&str], pool: &PgPool) -> UserId {
    let user = UserId::new();
    ProfileRecord::upsert(user, Some("Test User"), bucket, Some("en"), pool)
        .await
        .expect("failed to upsert profile");

    let mut ids = Vec::new();
    for code in diet_codes {
        ids.push(diet_id(code, pool).await);
    }
    ProfileRecord::replace_diets(user, &ids, pool)
        .await
        .expect("failed to set profile diets");

    user
}
