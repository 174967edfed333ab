mod common;

use common::{content, create_user, line, WRITE_TIMEOUT};
use diesel::prelude::*;
use tastecheck_core::{Actor, NutritionSource, Role};
use tastecheck_server::error::AppError;
use tastecheck_server::recipes::projection::load_recipe_detail;
use tastecheck_server::recipes::review_content::{
    apply_review_content, NutritionInput, ReviewContentPatch,
};
use tastecheck_server::recipes::writer::create_recipe;
use tastecheck_server::schema::tags;

fn soup(conn: &mut PgConnection, author: &Actor) -> i32 {
    let recipe = content(
        "Lentil soup",
        vec![line("Lentils", "200", Some("gram"))],
        &["Simmer"],
    );
    create_recipe(conn, author, &recipe, WRITE_TIMEOUT).unwrap()
}

fn tag_id(conn: &mut PgConnection, name: &str) -> i32 {
    tags::table
        .filter(tags::name.eq(name))
        .select(tags::id)
        .first(conn)
        .unwrap()
}

fn nutrition(calories: f64) -> ReviewContentPatch {
    ReviewContentPatch {
        nutritional_info: Some(NutritionInput {
            calories: Some(calories),
            protein_grams: Some(18.25),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[test]
fn test_nutrition_source_follows_the_writer() {
    let pool = require_db!();
    let mut conn = pool.get().unwrap();
    let author = create_user(&mut conn, Role::RecipeDeveloper);
    let nutritionist = create_user(&mut conn, Role::Nutritionist);
    let id = soup(&mut conn, &author);

    apply_review_content(&mut conn, id, &author, &nutrition(320.0)).unwrap();
    let detail = load_recipe_detail(&mut conn, id).unwrap();
    let info = detail.nutrition.unwrap();
    assert_eq!(info.data_source, Some(NutritionSource::EstimatedApi));
    assert_eq!(info.calories, Some(320.0));
    assert_eq!(info.protein_grams, Some(18.25));

    // A second write replaces the row rather than adding one.
    apply_review_content(&mut conn, id, &nutritionist, &nutrition(295.5)).unwrap();
    let detail = load_recipe_detail(&mut conn, id).unwrap();
    let info = detail.nutrition.unwrap();
    assert_eq!(info.data_source, Some(NutritionSource::VerifiedNutritionist));
    assert_eq!(info.calories, Some(295.5));
}

#[test]
fn test_tags_are_replaced() {
    let pool = require_db!();
    let mut conn = pool.get().unwrap();
    let author = create_user(&mut conn, Role::RecipeDeveloper);
    let id = soup(&mut conn, &author);
    let vegan = tag_id(&mut conn, "Vegan");
    let gluten_free = tag_id(&mut conn, "Gluten-Free");
    let vegetarian = tag_id(&mut conn, "Vegetarian");

    let set_tags = |ids: Vec<i32>| ReviewContentPatch {
        tags: Some(ids),
        ..Default::default()
    };

    apply_review_content(&mut conn, id, &author, &set_tags(vec![vegan, gluten_free, vegan]))
        .unwrap();
    let detail = load_recipe_detail(&mut conn, id).unwrap();
    let mut names: Vec<&str> = detail.tags.iter().map(|t| t.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["Gluten-Free", "Vegan"]);
    assert!(detail.tags.iter().all(|t| t.tag_type == "Dietary"));

    apply_review_content(&mut conn, id, &author, &set_tags(vec![vegetarian])).unwrap();
    let detail = load_recipe_detail(&mut conn, id).unwrap();
    let ids: Vec<i32> = detail.tags.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![vegetarian]);

    apply_review_content(&mut conn, id, &author, &set_tags(vec![])).unwrap();
    let detail = load_recipe_detail(&mut conn, id).unwrap();
    assert!(detail.tags.is_empty());
}

#[test]
fn test_unknown_tag_rejects_whole_patch() {
    let pool = require_db!();
    let mut conn = pool.get().unwrap();
    let author = create_user(&mut conn, Role::RecipeDeveloper);
    let nutritionist = create_user(&mut conn, Role::Nutritionist);
    let id = soup(&mut conn, &author);
    let vegan = tag_id(&mut conn, "Vegan");

    let patch = ReviewContentPatch {
        health_tips: Some("Go easy on salt".to_string()),
        tags: Some(vec![vegan, i32::MAX]),
        ..Default::default()
    };
    let err = apply_review_content(&mut conn, id, &nutritionist, &patch).unwrap_err();
    match err {
        AppError::Validation(ref e) => {
            assert_eq!(e.problems, vec![format!("Unknown tag id {}", i32::MAX)]);
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);

    let detail = load_recipe_detail(&mut conn, id).unwrap();
    assert!(detail.tags.is_empty());
    assert_eq!(detail.health_tips, None);
}

#[test]
fn test_health_tips_are_for_nutritionists() {
    let pool = require_db!();
    let mut conn = pool.get().unwrap();
    let author = create_user(&mut conn, Role::RecipeDeveloper);
    let nutritionist = create_user(&mut conn, Role::Nutritionist);
    let id = soup(&mut conn, &author);

    let tips = ReviewContentPatch {
        health_tips: Some("  Add greens  ".to_string()),
        ..Default::default()
    };
    let err = apply_review_content(&mut conn, id, &author, &tips).unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)), "{err:?}");
    assert_eq!(load_recipe_detail(&mut conn, id).unwrap().health_tips, None);

    apply_review_content(&mut conn, id, &nutritionist, &tips).unwrap();
    let detail = load_recipe_detail(&mut conn, id).unwrap();
    assert_eq!(detail.health_tips.as_deref(), Some("Add greens"));
}

#[test]
fn test_other_developers_cannot_see_the_recipe() {
    let pool = require_db!();
    let mut conn = pool.get().unwrap();
    let author = create_user(&mut conn, Role::RecipeDeveloper);
    let stranger = create_user(&mut conn, Role::RecipeDeveloper);
    let id = soup(&mut conn, &author);

    let err = apply_review_content(&mut conn, id, &stranger, &nutrition(100.0)).unwrap_err();
    assert!(matches!(err, AppError::NotFound), "{err:?}");
    assert!(load_recipe_detail(&mut conn, id).unwrap().nutrition.is_none());

    let err = apply_review_content(&mut conn, i32::MAX, &author, &nutrition(100.0)).unwrap_err();
    assert!(matches!(err, AppError::NotFound), "{err:?}");
}
