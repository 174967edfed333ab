//! User ratings. One per user and recipe; submitting again replaces it.

use crate::auth::load_recipe_access;
use crate::error::AppError;
use crate::models::NewReview;
use crate::schema::reviews;
use chrono::Utc;
use diesel::prelude::*;
use tastecheck_core::{Actor, ValidationError};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

pub fn submit_rating(
    conn: &mut PgConnection,
    recipe_id: i32,
    actor: &Actor,
    rating: i32,
    comment: Option<&str>,
) -> Result<i32, AppError> {
    let access = load_recipe_access(conn, recipe_id)?;
    actor.require_view(access.author_id, access.status)?;

    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::single(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        ))
        .into());
    }
    let comment = comment.map(str::trim).filter(|c| !c.is_empty());

    let review_id = diesel::insert_into(reviews::table)
        .values(&NewReview {
            recipe_id,
            user_id: actor.user_id,
            rating,
            comment,
        })
        .on_conflict((reviews::recipe_id, reviews::user_id))
        .do_update()
        .set((
            reviews::rating.eq(rating),
            reviews::comment.eq(comment),
            reviews::updated_at.eq(Utc::now()),
        ))
        .returning(reviews::id)
        .get_result::<i32>(conn)?;

    tracing::info!(recipe_id, review_id, user_id = actor.user_id, rating, "recipe rated");
    Ok(review_id)
}
