mod common;

use test_context::test_context;

use common::{seed_recipe, TestHarness};
use engine_core::common::{EngineError, UserId};
use engine_core::domains::audit::models::admin_audit::AdminAuditRecord;
use engine_core::domains::recipes::commands::admin::{block_recipe, update_version_admin};
use engine_core::domains::recipes::models::recipe::RecipeRecord;

#[test_context(TestHarness)]
#[tokio::test]
async fn blocking_records_changed_fields(ctx: &mut TestHarness) {
    let pool = &ctx.db_pool;
    let (recipe_id, _) = seed_recipe("Blocked Dish", 30, vec![], pool).await;

    let actor = UserId::new();
    let blocked = block_recipe(actor, recipe_id, true, Some("copyright claim"), pool)
        .await
        .unwrap();
    assert!(blocked.is_blocked);
    assert_eq!(blocked.blocked_by, Some(actor));
    assert!(blocked.blocked_at.is_some());

    let audits = AdminAuditRecord::find_for_target("recipes", &recipe_id.to_string(), pool)
        .await
        .unwrap();
    assert_eq!(audits.len(), 1);
    let audit = &audits[0];
    assert_eq!(audit.action, "block");
    assert_eq!(audit.actor_user_id, Some(actor));
    assert_eq!(audit.reason.as_deref(), Some("copyright claim"));

    // Changes come back ordered by column name; the block timestamp is
    // part of the diff alongside the flag and the actor.
    let changes = AdminAuditRecord::find_changes(audit.id, pool).await.unwrap();
    assert_eq!(changes.len(), 3);
    assert_eq!(changes[0].column_name, "blocked_at");
    assert!(changes[0].before_value.is_none());
    assert!(changes[0].after_value.is_some());
    assert_eq!(changes[1].column_name, "blocked_by");
    assert!(changes[1].before_value.is_none());
    assert_eq!(changes[1].after_value.as_deref(), Some(&*actor.to_string()));
    assert_eq!(changes[2].column_name, "is_blocked");
    assert_eq!(changes[2].before_value.as_deref(), Some("false"));
    assert_eq!(changes[2].after_value.as_deref(), Some("true"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn block_and_unblock_produce_separate_audit_rows(ctx: &mut TestHarness) {
    let pool = &ctx.db_pool;
    let (recipe_id, _) = seed_recipe("Toggled Dish", 30, vec![], pool).await;

    let actor = UserId::new();
    block_recipe(actor, recipe_id, true, None, pool).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let unblocked = block_recipe(actor, recipe_id, false, None, pool).await.unwrap();
    assert!(!unblocked.is_blocked);
    assert!(unblocked.blocked_by.is_none());

    let audits = AdminAuditRecord::find_for_target("recipes", &recipe_id.to_string(), pool)
        .await
        .unwrap();
    assert_eq!(audits.len(), 2);
    // Newest first.
    assert_eq!(audits[0].action, "unblock");
    assert_eq!(audits[1].action, "block");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn blocking_unknown_recipe_is_not_found(ctx: &mut TestHarness) {
    let pool = &ctx.db_pool;
    let result = block_recipe(
        UserId::new(),
        engine_core::common::RecipeId::new(),
        true,
        None,
        pool,
    )
    .await;
    assert!(matches!(result, Err(EngineError::NotFound)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn metadata_edit_records_both_fields(ctx: &mut TestHarness) {
    let pool = &ctx.db_pool;
    let (_, version) = seed_recipe("Edited Dish", 30, vec![], pool).await;

    let actor = UserId::new();
    let updated = update_version_admin(
        actor,
        version.id,
        Some(40),
        Some(90),
        Some("corrected after review"),
        pool,
    )
    .await
    .unwrap();
    assert_eq!(updated.prep_time_estimate, Some(40));
    assert_eq!(updated.quality_score, Some(90));

    let audits = AdminAuditRecord::find_for_target("recipe_versions", &version.id.to_string(), pool)
        .await
        .unwrap();
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0].action, "update_metadata");

    let changes = AdminAuditRecord::find_changes(audits[0].id, pool).await.unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].column_name, "prep_time_estimate");
    assert_eq!(changes[0].before_value.as_deref(), Some("30"));
    assert_eq!(changes[0].after_value.as_deref(), Some("40"));
    assert_eq!(changes[1].column_name, "quality_score");
    assert_eq!(changes[1].before_value.as_deref(), Some("75"));
    assert_eq!(changes[1].after_value.as_deref(), Some("90"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn noop_edit_writes_the_audit_row_without_changes(ctx: &mut TestHarness) {
    let pool = &ctx.db_pool;
    let (_, version) = seed_recipe("Unchanged Dish", 30, vec![], pool).await;

    // Same values as the seed content: the action is still recorded,
    // the per-field diff is empty.
    update_version_admin(UserId::new(), version.id, Some(30), Some(75), None, pool)
        .await
        .unwrap();

    let audits = AdminAuditRecord::find_for_target("recipe_versions", &version.id.to_string(), pool)
        .await
        .unwrap();
    assert_eq!(audits.len(), 1);

    let changes = AdminAuditRecord::find_changes(audits[0].id, pool).await.unwrap();
    assert!(changes.is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn metadata_edit_validates_ranges(ctx: &mut TestHarness) {
    let pool = &ctx.db_pool;
    let (_, version) = seed_recipe("Validated Dish", 30, vec![], pool).await;

    let result =
        update_version_admin(UserId::new(), version.id, None, Some(101), None, pool).await;
    assert!(matches!(result, Err(EngineError::Validation(_))));

    let result =
        update_version_admin(UserId::new(), version.id, Some(-1), None, None, pool).await;
    assert!(matches!(result, Err(EngineError::Validation(_))));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn metadata_edit_does_not_create_a_new_version(ctx: &mut TestHarness) {
    let pool = &ctx.db_pool;
    let (recipe_id, version) = seed_recipe("Stable Dish", 30, vec![], pool).await;

    update_version_admin(UserId::new(), version.id, Some(35), None, None, pool)
        .await
        .unwrap();

    let recipe = RecipeRecord::find_by_id(recipe_id, pool).await.unwrap().unwrap();
    assert_eq!(recipe.current_version_id, Some(version.id));

    let count: i64 =
        sqlx::query_scalar("SELECT count(*) FROM recipe_versions WHERE recipe_id = $1")
            .bind(recipe_id)
            .fetch_one(pool)
            .await
            .unwrap();
    assert_eq!(count, 1);
}
