//! Persisting verification transitions.

use crate::auth::lock_recipe_access;
use crate::error::AppError;
use crate::schema::recipes;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tastecheck_core::{plan_transition, Actor, ReviewEvent, ReviewerLink, Transition};

/// Apply `event` to a recipe under its row lock. The whole decision is made
/// by [`plan_transition`] against the locked status, so two reviewers acting
/// at once cannot both succeed from the same state.
pub fn change_status(
    conn: &mut PgConnection,
    recipe_id: i32,
    actor: &Actor,
    event: &ReviewEvent,
) -> Result<Transition, AppError> {
    let transition = conn.transaction::<_, AppError, _>(|conn| {
        let access = lock_recipe_access(conn, recipe_id)?;
        let transition = plan_transition(access.status, event, actor, access.author_id)?;

        let now = Utc::now();
        let target = recipes::table.find(recipe_id);
        let status = recipes::status.eq(transition.to.as_str());

        // verified_at is constrained to be set exactly when verified, so the
        // status and reviewer columns change in one statement.
        match transition.reviewer {
            ReviewerLink::Verified { reviewer_id } => {
                diesel::update(target)
                    .set((
                        status,
                        recipes::verified_by_id.eq(Some(reviewer_id)),
                        recipes::verified_at.eq(Some(now)),
                        recipes::updated_at.eq(now),
                    ))
                    .execute(conn)?;
            }
            ReviewerLink::RevisionRequested { reviewer_id } => {
                diesel::update(target)
                    .set((
                        status,
                        recipes::verified_by_id.eq(Some(reviewer_id)),
                        recipes::verified_at.eq(None::<DateTime<Utc>>),
                        recipes::updated_at.eq(now),
                    ))
                    .execute(conn)?;
            }
            ReviewerLink::Unchanged => {
                diesel::update(target)
                    .set((status, recipes::updated_at.eq(now)))
                    .execute(conn)?;
            }
        }

        if let Some(tips) = &transition.health_tips {
            diesel::update(recipes::table.find(recipe_id))
                .set(recipes::health_tips.eq(tips))
                .execute(conn)?;
        }

        Ok(transition)
    })?;

    tracing::info!(
        recipe_id,
        from = %transition.from,
        to = %transition.to,
        event = event.name(),
        actor_id = actor.user_id,
        actor_role = %actor.role,
        "recipe status changed"
    );

    Ok(transition)
}
