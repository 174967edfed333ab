//! Create, update and delete recipes.
//!
//! A recipe's content spans the recipe row and its ingredient lines, steps
//! and media. Every write replaces the child collections wholesale inside one
//! transaction, so a failed write leaves the recipe exactly as it was and a
//! retried write converges on the same result.

use crate::auth::{load_recipe_access, lock_recipe_access};
use crate::error::AppError;
use crate::models::{NewMedia, NewPreparationStep, NewRecipe, NewRecipeIngredient, RecipeScalars};
use crate::recipes::deadline::WriteDeadline;
use crate::recipes::normalizer::resolve_references;
use crate::schema::{media, preparation_steps, recipe_ingredients, recipes};
use chrono::Utc;
use diesel::prelude::*;
use std::time::Duration;
use tastecheck_core::{
    Actor, Capability, RecipeContent, ReferencePlan, UnresolvedReference, ValidatedContent,
    VerificationStatus,
};

/// Create a recipe owned by `actor` in `pending_verification`.
pub fn create_recipe(
    conn: &mut PgConnection,
    actor: &Actor,
    content: &RecipeContent,
    budget: Duration,
) -> Result<i32, AppError> {
    actor.require(Capability::AuthorRecipes)?;
    let validated = content.validate()?;
    let deadline = WriteDeadline::start(budget);

    let recipe_id = conn.transaction::<_, AppError, _>(|conn| {
        deadline.check(conn, "recipe")?;
        let recipe_id: i32 = diesel::insert_into(recipes::table)
            .values(&NewRecipe {
                author_id: actor.user_id,
                title: &validated.title,
                description: validated.description.as_deref(),
                cooking_time_minutes: validated.cooking_time_minutes,
                servings: validated.servings,
                status: VerificationStatus::PendingVerification.as_str(),
            })
            .returning(recipes::id)
            .get_result(conn)?;

        // A new recipe has no earlier media to drop.
        write_children(conn, recipe_id, &validated, &deadline)?;
        Ok(recipe_id)
    })?;

    tracing::info!(recipe_id, author_id = actor.user_id, "recipe created");
    Ok(recipe_id)
}

/// Replace a recipe's content. Only its author may do this, and only until
/// it is verified. Returns the urls of media the new content dropped.
pub fn update_recipe(
    conn: &mut PgConnection,
    recipe_id: i32,
    actor: &Actor,
    content: &RecipeContent,
    budget: Duration,
) -> Result<Vec<String>, AppError> {
    // Ownership is answered before the body is looked at.
    let access = load_recipe_access(conn, recipe_id)?;
    actor.require_owner(access.author_id)?;

    let validated = content.validate()?;
    let deadline = WriteDeadline::start(budget);

    let dropped_media = conn.transaction::<_, AppError, _>(|conn| {
        deadline.check(conn, "lock")?;

        // Re-read under the row lock; the status may have moved since.
        let access = lock_recipe_access(conn, recipe_id)?;
        actor.require_owner(access.author_id)?;
        if access.status.is_locked() {
            return Err(AppError::RecipeLocked);
        }

        deadline.check(conn, "recipe")?;
        diesel::update(recipes::table.find(recipe_id))
            .set((
                &RecipeScalars {
                    title: &validated.title,
                    description: validated.description.as_deref(),
                    cooking_time_minutes: validated.cooking_time_minutes,
                    servings: validated.servings,
                },
                recipes::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;

        deadline.check(conn, "clear ingredients")?;
        diesel::delete(
            recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
        )
        .execute(conn)?;
        deadline.check(conn, "clear steps")?;
        diesel::delete(
            preparation_steps::table.filter(preparation_steps::recipe_id.eq(recipe_id)),
        )
        .execute(conn)?;

        write_children(conn, recipe_id, &validated, &deadline)
    })?;

    tracing::info!(recipe_id, author_id = actor.user_id, "recipe updated");
    Ok(dropped_media)
}

/// Delete a recipe and everything it owns. Returns the urls of its media so
/// the caller can remove them from the media store after the commit.
pub fn delete_recipe(
    conn: &mut PgConnection,
    recipe_id: i32,
    actor: &Actor,
) -> Result<Vec<String>, AppError> {
    let urls = conn.transaction::<_, AppError, _>(|conn| {
        let access = lock_recipe_access(conn, recipe_id)?;
        actor.require_owner(access.author_id)?;

        let urls: Vec<String> = media::table
            .filter(media::recipe_id.eq(recipe_id))
            .order(media::id.asc())
            .select(media::url)
            .load(conn)?;

        diesel::delete(recipes::table.find(recipe_id)).execute(conn)?;
        Ok(urls)
    })?;

    tracing::info!(
        recipe_id,
        author_id = actor.user_id,
        media = urls.len(),
        "recipe deleted"
    );
    Ok(urls)
}

/// Normalize references, then insert ingredient lines, steps and (when
/// submitted) media. Existing lines and steps must already be gone.
///
/// Returns the urls of replaced media that the new set no longer uses.
fn write_children(
    conn: &mut PgConnection,
    recipe_id: i32,
    content: &ValidatedContent,
    deadline: &WriteDeadline,
) -> Result<Vec<String>, AppError> {
    let plan = ReferencePlan::from_lines(&content.ingredients);
    let references = resolve_references(conn, &plan, deadline)?;

    let lines = content
        .ingredients
        .iter()
        .map(|line| {
            let (ingredient_id, unit_id) = references.resolve(line)?;
            Ok(NewRecipeIngredient {
                recipe_id,
                ingredient_id,
                unit_id,
                quantity: &line.quantity,
                notes: line.notes.as_deref(),
                position: line.position,
            })
        })
        .collect::<Result<Vec<_>, UnresolvedReference>>()
        .inspect_err(|e| {
            tracing::error!(recipe_id, error = %e, "ingredient reference missing after normalization")
        })?;

    deadline.check(conn, "ingredients")?;
    diesel::insert_into(recipe_ingredients::table)
        .values(&lines)
        .execute(conn)?;

    let steps: Vec<NewPreparationStep> = content
        .steps
        .iter()
        .map(|step| NewPreparationStep {
            recipe_id,
            step_number: step.step_number,
            instruction: &step.instruction,
        })
        .collect();
    deadline.check(conn, "steps")?;
    diesel::insert_into(preparation_steps::table)
        .values(&steps)
        .execute(conn)?;

    let mut dropped = Vec::new();
    if let Some(items) = &content.media {
        deadline.check(conn, "clear media")?;
        let previous: Vec<String> =
            diesel::delete(media::table.filter(media::recipe_id.eq(recipe_id)))
                .returning(media::url)
                .get_results(conn)?;
        dropped = previous
            .into_iter()
            .filter(|url| !items.iter().any(|item| &item.url == url))
            .collect();

        if !items.is_empty() {
            let rows: Vec<NewMedia> = items
                .iter()
                .map(|item| NewMedia {
                    recipe_id,
                    media_type: item.media_type.as_str(),
                    url: &item.url,
                    caption: item.caption.as_deref(),
                })
                .collect();
            deadline.check(conn, "media")?;
            diesel::insert_into(media::table).values(&rows).execute(conn)?;
        }
    }

    Ok(dropped)
}
