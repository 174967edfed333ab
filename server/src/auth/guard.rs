//! Ownership and visibility lookups. The decisions themselves live on
//! [`tastecheck_core::Actor`]; this module only fetches what they need.

use crate::error::AppError;
use crate::schema::recipes;
use diesel::prelude::*;
use tastecheck_core::VerificationStatus;

/// The columns every permission check reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeAccess {
    pub id: i32,
    pub author_id: i32,
    pub status: VerificationStatus,
}

/// Missing recipes are [`AppError::NotFound`].
pub fn load_recipe_access(conn: &mut PgConnection, recipe_id: i32) -> Result<RecipeAccess, AppError> {
    let (author_id, status) = recipes::table
        .find(recipe_id)
        .select((recipes::author_id, recipes::status))
        .first::<(i32, String)>(conn)?;
    Ok(RecipeAccess {
        id: recipe_id,
        author_id,
        status: parse_status(&status)?,
    })
}

/// Like [`load_recipe_access`], but takes the row lock (`FOR UPDATE`) so
/// concurrent writers to the same recipe queue behind this transaction.
pub fn lock_recipe_access(conn: &mut PgConnection, recipe_id: i32) -> Result<RecipeAccess, AppError> {
    let (author_id, status) = recipes::table
        .find(recipe_id)
        .select((recipes::author_id, recipes::status))
        .for_update()
        .first::<(i32, String)>(conn)?;
    Ok(RecipeAccess {
        id: recipe_id,
        author_id,
        status: parse_status(&status)?,
    })
}

/// Stored statuses are guarded by a CHECK constraint; anything else is a
/// corrupt row.
pub fn parse_status(status: &str) -> Result<VerificationStatus, AppError> {
    VerificationStatus::parse(status).ok_or_else(|| {
        AppError::Persistence(diesel::result::Error::DeserializationError(
            format!("unknown recipe status '{status}'").into(),
        ))
    })
}
