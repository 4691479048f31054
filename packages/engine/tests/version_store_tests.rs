mod common;

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use test_context::test_context;

use common::{ingredient_line, seed_recipe, version_content, TestHarness};
use engine_core::common::{EngineError, RecipeId};
use engine_core::domains::recipes::commands::version_store;
use engine_core::domains::recipes::models::diet::DietRecord;
use engine_core::domains::recipes::models::ingredient::RecipeIngredientRecord;
use engine_core::domains::recipes::models::recipe::RecipeRecord;
use engine_core::domains::recipes::models::recipe_version::RecipeVersionRecord;

#[test_context(TestHarness)]
#[tokio::test]
async fn first_version_starts_at_one_and_is_current(ctx: &mut TestHarness) {
    let pool = &ctx.db_pool;
    let (recipe_id, version) = seed_recipe("Tomato Soup", 30, vec![], pool).await;

    assert_eq!(version.version, 1);
    assert!(version.is_current);
    assert!(version.valid_to.is_none());

    let recipe = RecipeRecord::find_by_id(recipe_id, pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(recipe.current_version_id, Some(version.id));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn validity_intervals_tile_without_gaps(ctx: &mut TestHarness) {
    let pool = &ctx.db_pool;
    let (recipe_id, _) = seed_recipe("Tomato Soup", 30, vec![], pool).await;

    for title in ["Tomato Soup v2", "Tomato Soup v3"] {
        tokio::time::sleep(Duration::from_millis(10)).await;
        version_store::create_version(recipe_id, version_content(title, 30, vec![]), pool)
            .await
            .unwrap();
    }

    let versions = RecipeVersionRecord::find_all_for_recipe(recipe_id, pool)
        .await
        .unwrap();
    assert_eq!(versions.len(), 3);
    assert_eq!(
        versions.iter().map(|v| v.version).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    // Each closed interval ends exactly where the next one starts.
    for pair in versions.windows(2) {
        assert_eq!(pair[0].valid_to, Some(pair[1].valid_from));
    }
    assert!(versions.last().unwrap().valid_to.is_none());
    assert_eq!(versions.iter().filter(|v| v.is_current).count(), 1);
    assert!(versions.last().unwrap().is_current);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn get_as_of_resolves_superseded_versions(ctx: &mut TestHarness) {
    let pool = &ctx.db_pool;
    let (recipe_id, v1) = seed_recipe("Pancakes", 20, vec![], pool).await;

    tokio::time::sleep(Duration::from_millis(20)).await;
    let mid = Utc::now();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let v2 = version_store::create_version(
        recipe_id,
        version_content("Pancakes (fluffier)", 25, vec![]),
        pool,
    )
    .await
    .unwrap();

    let at_mid = version_store::get_as_of(recipe_id, mid, pool).await.unwrap();
    assert_eq!(at_mid.id, v1.id);

    let at_now = version_store::get_as_of(recipe_id, Utc::now(), pool)
        .await
        .unwrap();
    assert_eq!(at_now.id, v2.id);

    let before_any = v1.valid_from - ChronoDuration::seconds(5);
    let result = version_store::get_as_of(recipe_id, before_any, pool).await;
    assert!(matches!(result, Err(EngineError::NotFound)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn get_current_follows_the_latest_version(ctx: &mut TestHarness) {
    let pool = &ctx.db_pool;
    let (recipe_id, v1) = seed_recipe("Chili", 45, vec![], pool).await;

    let current = version_store::get_current(recipe_id, pool).await.unwrap();
    assert_eq!(current.id, v1.id);

    let v2 = version_store::create_version(
        recipe_id,
        version_content("Chili con Carne", 45, vec![]),
        pool,
    )
    .await
    .unwrap();

    let current = version_store::get_current(recipe_id, pool).await.unwrap();
    assert_eq!(current.id, v2.id);

    let recipe = RecipeRecord::find_by_id(recipe_id, pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(recipe.current_version_id, Some(v2.id));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_version_for_unknown_recipe_is_not_found(ctx: &mut TestHarness) {
    let pool = &ctx.db_pool;
    let result = version_store::create_version(
        RecipeId::new(),
        version_content("Ghost", 30, vec![]),
        pool,
    )
    .await;
    assert!(matches!(result, Err(EngineError::NotFound)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn ingredient_lines_keep_caller_order(ctx: &mut TestHarness) {
    let pool = &ctx.db_pool;
    let recipe = RecipeRecord::create(pool).await.unwrap();

    let mut content = version_content("Salad", 15, vec![]);
    content.ingredients = vec![
        ingredient_line("Lettuce"),
        ingredient_line("Tomato"),
        ingredient_line("Cucumber"),
    ];
    let version = version_store::create_version(recipe.id, content, pool)
        .await
        .unwrap();

    let lines = RecipeIngredientRecord::find_for_version(version.id, pool)
        .await
        .unwrap();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines.iter().map(|l| l.position).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn ingredients_are_shared_case_insensitively(ctx: &mut TestHarness) {
    let pool = &ctx.db_pool;
    let recipe = RecipeRecord::create(pool).await.unwrap();

    let mut content = version_content("Onion Soup", 30, vec![]);
    content.ingredients = vec![ingredient_line("Sweet Onion")];
    let v1 = version_store::create_version(recipe.id, content, pool)
        .await
        .unwrap();

    let mut content = version_content("Onion Soup v2", 30, vec![]);
    content.ingredients = vec![ingredient_line("sweet onion")];
    let v2 = version_store::create_version(recipe.id, content, pool)
        .await
        .unwrap();

    let l1 = RecipeIngredientRecord::find_for_version(v1.id, pool)
        .await
        .unwrap();
    let l2 = RecipeIngredientRecord::find_for_version(v2.id, pool)
        .await
        .unwrap();
    assert_eq!(l1[0].ingredient_id, l2[0].ingredient_id);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn diacritic_ingredient_variants_share_one_row(ctx: &mut TestHarness) {
    let pool = &ctx.db_pool;
    let recipe = RecipeRecord::create(pool).await.unwrap();

    let mut content = version_content("Dessert", 60, vec![]);
    content.ingredients = vec![ingredient_line("Creme Brulee Base")];
    let v1 = version_store::create_version(recipe.id, content, pool)
        .await
        .unwrap();

    // Same ingredient spelled with diacritics must not abort the
    // version; it resolves to the row already in the dictionary.
    let mut content = version_content("Dessert v2", 60, vec![]);
    content.ingredients = vec![ingredient_line("Crème Brûlée Base")];
    let v2 = version_store::create_version(recipe.id, content, pool)
        .await
        .unwrap();

    let l1 = RecipeIngredientRecord::find_for_version(v1.id, pool)
        .await
        .unwrap();
    let l2 = RecipeIngredientRecord::find_for_version(v2.id, pool)
        .await
        .unwrap();
    assert_eq!(l1[0].ingredient_id, l2[0].ingredient_id);

    let rows: i64 =
        sqlx::query_scalar("SELECT count(*) FROM ingredients WHERE name_normalized = $1")
            .bind("creme brulee base")
            .fetch_one(pool)
            .await
            .unwrap();
    assert_eq!(rows, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn diet_tags_attach_to_the_version(ctx: &mut TestHarness) {
    let pool = &ctx.db_pool;
    let vegan = common::diet_id("vegan", pool).await;
    let (_, version) = seed_recipe("Lentil Curry", 40, vec![vegan], pool).await;

    let diets = DietRecord::find_for_version(version.id, pool).await.unwrap();
    assert_eq!(diets.len(), 1);
    assert_eq!(diets[0].code, "vegan");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn titles_are_normalized_for_lookup(ctx: &mut TestHarness) {
    let pool = &ctx.db_pool;
    let (_, version) = seed_recipe("Crème Brûlée", 60, vec![], pool).await;
    assert_eq!(version.title, "Crème Brûlée");
    assert_eq!(version.title_normalized, "creme brulee");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn invalid_content_is_rejected_without_writes(ctx: &mut TestHarness) {
    let pool = &ctx.db_pool;
    let (recipe_id, _) = seed_recipe("Stew", 50, vec![], pool).await;

    let mut bad = version_content("Stew", 50, vec![]);
    bad.quality_score = Some(150);
    let result = version_store::create_version(recipe_id, bad, pool).await;
    assert!(matches!(result, Err(EngineError::Validation(_))));

    let versions = RecipeVersionRecord::find_all_for_recipe(recipe_id, pool)
        .await
        .unwrap();
    assert_eq!(versions.len(), 1);
}
