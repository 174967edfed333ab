use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::get_conn;
use crate::media_store::cleanup_media;
use crate::recipes::writer;
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeleteRecipeResponse {
    pub message: String,
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe deleted", body = DeleteRecipeResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_recipe(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    let media_urls = match writer::delete_recipe(&mut conn, id, &actor) {
        Ok(urls) => urls,
        Err(e) => return e.into_response(),
    };
    drop(conn);

    // The recipe is gone either way; media failures are only logged.
    let report = cleanup_media(state.media.as_ref(), &media_urls).await;
    if report.failed > 0 {
        tracing::warn!(
            recipe_id = id,
            removed = report.removed,
            failed = report.failed,
            "some recipe media could not be deleted"
        );
    }

    Json(DeleteRecipeResponse {
        message: "Recipe deleted".to_string(),
    })
    .into_response()
}
