mod common;

use common::{content, create_user, image, line, unique, WRITE_TIMEOUT};
use diesel::dsl::count_star;
use diesel::prelude::*;
use std::sync::Barrier;
use std::time::Duration;
use tastecheck_core::{ingredient_key, ReviewEvent, Role, VerificationStatus};
use tastecheck_server::error::AppError;
use tastecheck_server::models::NewIngredient;
use tastecheck_server::recipes::projection::{load_recipe_detail, RecipeDetail};
use tastecheck_server::recipes::review::change_status;
use tastecheck_server::recipes::writer::{create_recipe, delete_recipe, update_recipe};
use tastecheck_server::schema::{ingredients, recipes};

fn ingredient_names(detail: &RecipeDetail) -> Vec<String> {
    detail.ingredients.iter().map(|i| i.name.clone()).collect()
}

fn steps(detail: &RecipeDetail) -> Vec<(i32, String)> {
    detail
        .steps
        .iter()
        .map(|s| (s.step_number, s.instruction.clone()))
        .collect()
}

#[test]
fn test_create_stores_content_in_submission_order() {
    let pool = require_db!();
    let mut conn = pool.get().unwrap();
    let author = create_user(&mut conn, Role::RecipeDeveloper);

    let recipe = content(
        "Pancakes",
        vec![
            line("Milk", "1 1/2", Some("cup")),
            line("Flour", "2", Some("cup")),
            line("Egg", "1", None),
        ],
        &["Whisk", "Fry"],
    );
    let id = create_recipe(&mut conn, &author, &recipe, WRITE_TIMEOUT).unwrap();

    let detail = load_recipe_detail(&mut conn, id).unwrap();
    assert_eq!(detail.status, VerificationStatus::PendingVerification);
    assert_eq!(detail.author.id, author.user_id);
    assert_eq!(ingredient_names(&detail), vec!["Milk", "Flour", "Egg"]);
    assert_eq!(detail.ingredients[0].quantity, "1.5");
    assert_eq!(detail.ingredients[0].unit.as_deref(), Some("cup"));
    assert_eq!(detail.ingredients[2].unit, None);
    assert_eq!(
        steps(&detail),
        vec![(1, "Whisk".to_string()), (2, "Fry".to_string())]
    );
    assert_eq!(detail.review_count, 0);
    assert_eq!(detail.average_rating, None);
}

#[test]
fn test_only_developers_create_recipes() {
    let pool = require_db!();
    let mut conn = pool.get().unwrap();
    let nutritionist = create_user(&mut conn, Role::Nutritionist);

    let recipe = content("Soup", vec![line("Water", "1", Some("liter"))], &["Boil"]);
    let err = create_recipe(&mut conn, &nutritionist, &recipe, WRITE_TIMEOUT).unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[test]
fn test_update_replaces_ingredients() {
    let pool = require_db!();
    let mut conn = pool.get().unwrap();
    let author = create_user(&mut conn, Role::RecipeDeveloper);

    let id = create_recipe(
        &mut conn,
        &author,
        &content(
            "Salad",
            vec![line("Lettuce", "1", None), line("Tomato", "2", None)],
            &["Chop"],
        ),
        WRITE_TIMEOUT,
    )
    .unwrap();

    update_recipe(
        &mut conn,
        id,
        &author,
        &content("Salad", vec![line("Cucumber", "1", None)], &["Chop"]),
        WRITE_TIMEOUT,
    )
    .unwrap();

    let detail = load_recipe_detail(&mut conn, id).unwrap();
    assert_eq!(ingredient_names(&detail), vec!["Cucumber"]);
}

#[test]
fn test_update_renumbers_steps() {
    let pool = require_db!();
    let mut conn = pool.get().unwrap();
    let author = create_user(&mut conn, Role::RecipeDeveloper);

    let ingredients = || vec![line("Egg", "2", Some("piece"))];
    let id = create_recipe(
        &mut conn,
        &author,
        &content("Eggs", ingredients(), &["x", "y", "z"]),
        WRITE_TIMEOUT,
    )
    .unwrap();

    update_recipe(
        &mut conn,
        id,
        &author,
        &content("Eggs", ingredients(), &["", "y", "z"]),
        WRITE_TIMEOUT,
    )
    .unwrap();

    let detail = load_recipe_detail(&mut conn, id).unwrap();
    assert_eq!(
        steps(&detail),
        vec![(1, "y".to_string()), (2, "z".to_string())]
    );
}

#[test]
fn test_ingredients_shared_case_insensitively() {
    let pool = require_db!();
    let mut conn = pool.get().unwrap();
    let author = create_user(&mut conn, Role::RecipeDeveloper);
    let name = unique("Flour");

    for spelling in [name.clone(), name.to_uppercase()] {
        create_recipe(
            &mut conn,
            &author,
            &content("Bread", vec![line(&spelling, "500", Some("gram"))], &["Bake"]),
            WRITE_TIMEOUT,
        )
        .unwrap();
    }

    let rows: i64 = ingredients::table
        .filter(ingredients::name_key.eq(ingredient_key(&name)))
        .select(count_star())
        .first(&mut conn)
        .unwrap();
    assert_eq!(rows, 1);

    // The first writer's casing is kept.
    let stored: String = ingredients::table
        .filter(ingredients::name_key.eq(ingredient_key(&name)))
        .select(ingredients::name)
        .first(&mut conn)
        .unwrap();
    assert_eq!(stored, name);
}

#[test]
fn test_concurrent_writers_share_new_ingredient() {
    let pool = require_db!();
    let mut conn = pool.get().unwrap();
    let first = create_user(&mut conn, Role::RecipeDeveloper);
    let second = create_user(&mut conn, Role::RecipeDeveloper);
    let name = unique("Saffron");

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = [first, second]
            .into_iter()
            .map(|author| {
                let pool = pool.clone();
                let name = name.clone();
                scope.spawn(move || {
                    let mut conn = pool.get().unwrap();
                    create_recipe(
                        &mut conn,
                        &author,
                        &content("Paella", vec![line(&name, "1", Some("pinch"))], &["Cook"]),
                        WRITE_TIMEOUT,
                    )
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(results.iter().all(Result::is_ok), "{results:?}");
    let rows: i64 = ingredients::table
        .filter(ingredients::name_key.eq(ingredient_key(&name)))
        .select(count_star())
        .first(&mut conn)
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn test_update_stuck_after_clearing_rolls_back() {
    let pool = require_db!();
    let mut conn = pool.get().unwrap();
    let author = create_user(&mut conn, Role::RecipeDeveloper);

    let id = create_recipe(
        &mut conn,
        &author,
        &content("Toast", vec![line("Bread", "2", Some("piece"))], &["Toast it"]),
        WRITE_TIMEOUT,
    )
    .unwrap();
    let before = load_recipe_detail(&mut conn, id).unwrap();

    // Another transaction holds an uncommitted row for the new ingredient, so
    // the update clears the old lines and then blocks in the normalizer until
    // its deadline cancels the statement.
    let contested = unique("Butter");
    let key = ingredient_key(&contested);
    let barrier = Barrier::new(2);

    let result = std::thread::scope(|scope| {
        let blocker = scope.spawn(|| {
            let mut other = pool.get().unwrap();
            let _ = other.transaction::<(), diesel::result::Error, _>(|other| {
                diesel::insert_into(ingredients::table)
                    .values(&NewIngredient {
                        name: &contested,
                        name_key: &key,
                    })
                    .execute(other)?;
                barrier.wait();
                barrier.wait();
                Err(diesel::result::Error::RollbackTransaction)
            });
        });

        barrier.wait();
        let result = update_recipe(
            &mut conn,
            id,
            &author,
            &content(
                "Better toast",
                vec![line(&contested, "1", Some("tablespoon"))],
                &["New step"],
            ),
            Duration::from_secs(1),
        );
        barrier.wait();
        blocker.join().unwrap();
        result
    });
    assert!(matches!(result, Err(AppError::Timeout)), "{result:?}");

    let after = load_recipe_detail(&mut conn, id).unwrap();
    assert_eq!(after.title, "Toast");
    assert_eq!(ingredient_names(&after), ingredient_names(&before));
    assert_eq!(steps(&after), steps(&before));
}

#[test]
fn test_oversized_input_is_a_validation_error() {
    let pool = require_db!();
    let mut conn = pool.get().unwrap();
    let author = create_user(&mut conn, Role::RecipeDeveloper);

    let long_title = "t".repeat(300);
    let err = create_recipe(
        &mut conn,
        &author,
        &content(&long_title, vec![line("Egg", "1", None)], &["Boil"]),
        WRITE_TIMEOUT,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "{err:?}");

    let long_unit = "u".repeat(65);
    let err = create_recipe(
        &mut conn,
        &author,
        &content("Eggs", vec![line("Egg", "1", Some(&long_unit))], &["Boil"]),
        WRITE_TIMEOUT,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "{err:?}");
}

#[test]
fn test_timed_out_update_changes_nothing() {
    let pool = require_db!();
    let mut conn = pool.get().unwrap();
    let author = create_user(&mut conn, Role::RecipeDeveloper);

    let id = create_recipe(
        &mut conn,
        &author,
        &content("Rice", vec![line("Rice", "1", Some("cup"))], &["Steam"]),
        WRITE_TIMEOUT,
    )
    .unwrap();

    let err = update_recipe(
        &mut conn,
        id,
        &author,
        &content("Fried rice", vec![line("Rice", "2", Some("cup"))], &["Fry"]),
        Duration::ZERO,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Timeout));

    let after = load_recipe_detail(&mut conn, id).unwrap();
    assert_eq!(after.title, "Rice");
    assert_eq!(after.ingredients[0].quantity, "1");
}

#[test]
fn test_non_author_update_is_not_found() {
    let pool = require_db!();
    let mut conn = pool.get().unwrap();
    let author = create_user(&mut conn, Role::RecipeDeveloper);
    let stranger = create_user(&mut conn, Role::RecipeDeveloper);
    let nutritionist = create_user(&mut conn, Role::Nutritionist);

    let recipe = content("Stew", vec![line("Beef", "1", Some("kilogram"))], &["Simmer"]);
    let id = create_recipe(&mut conn, &author, &recipe, WRITE_TIMEOUT).unwrap();

    for actor in [stranger, nutritionist] {
        let err = update_recipe(&mut conn, id, &actor, &recipe, WRITE_TIMEOUT).unwrap_err();
        assert!(matches!(err, AppError::NotFound));
        let err = delete_recipe(&mut conn, id, &actor).unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    // Ownership is decided before the body is validated.
    let invalid = content("", vec![], &[]);
    let err = update_recipe(&mut conn, id, &stranger, &invalid, WRITE_TIMEOUT).unwrap_err();
    assert!(matches!(err, AppError::NotFound));
}

#[test]
fn test_verified_recipe_is_locked() {
    let pool = require_db!();
    let mut conn = pool.get().unwrap();
    let author = create_user(&mut conn, Role::RecipeDeveloper);
    let nutritionist = create_user(&mut conn, Role::Nutritionist);

    let recipe = content("Oats", vec![line("Oats", "50", Some("gram"))], &["Soak"]);
    let id = create_recipe(&mut conn, &author, &recipe, WRITE_TIMEOUT).unwrap();
    change_status(&mut conn, id, &nutritionist, &ReviewEvent::Verify).unwrap();

    let err = update_recipe(&mut conn, id, &author, &recipe, WRITE_TIMEOUT).unwrap_err();
    assert!(matches!(err, AppError::RecipeLocked));
}

#[test]
fn test_media_replaced_only_when_submitted() {
    let pool = require_db!();
    let mut conn = pool.get().unwrap();
    let author = create_user(&mut conn, Role::RecipeDeveloper);

    let a = "https://cdn.test/media/a.jpg";
    let b = "https://cdn.test/media/b.jpg";
    let with_media = |urls: Option<Vec<&str>>| {
        let mut recipe = content("Cake", vec![line("Sugar", "100", Some("gram"))], &["Bake"]);
        recipe.media = urls.map(|urls| urls.into_iter().map(image).collect());
        recipe
    };

    let id = create_recipe(&mut conn, &author, &with_media(Some(vec![a, b])), WRITE_TIMEOUT)
        .unwrap();

    let dropped = update_recipe(&mut conn, id, &author, &with_media(None), WRITE_TIMEOUT).unwrap();
    assert!(dropped.is_empty());
    assert_eq!(load_recipe_detail(&mut conn, id).unwrap().media.len(), 2);

    let dropped =
        update_recipe(&mut conn, id, &author, &with_media(Some(vec![b])), WRITE_TIMEOUT).unwrap();
    assert_eq!(dropped, vec![a.to_string()]);

    let dropped =
        update_recipe(&mut conn, id, &author, &with_media(Some(vec![])), WRITE_TIMEOUT).unwrap();
    assert_eq!(dropped, vec![b.to_string()]);
    assert!(load_recipe_detail(&mut conn, id).unwrap().media.is_empty());
}

#[test]
fn test_delete_returns_media_and_removes_recipe() {
    let pool = require_db!();
    let mut conn = pool.get().unwrap();
    let author = create_user(&mut conn, Role::RecipeDeveloper);

    let mut recipe = content("Pie", vec![line("Apple", "3", None)], &["Bake"]);
    recipe.media = Some(vec![image("https://cdn.test/media/pie.jpg")]);
    let id = create_recipe(&mut conn, &author, &recipe, WRITE_TIMEOUT).unwrap();

    let urls = delete_recipe(&mut conn, id, &author).unwrap();
    assert_eq!(urls, vec!["https://cdn.test/media/pie.jpg".to_string()]);

    let remaining: i64 = recipes::table
        .filter(recipes::id.eq(id))
        .select(count_star())
        .first(&mut conn)
        .unwrap();
    assert_eq!(remaining, 0);
    assert!(matches!(
        load_recipe_detail(&mut conn, id),
        Err(AppError::NotFound)
    ));
}
