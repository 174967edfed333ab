use super::RecipeIdResponse;
use crate::api::json::ApiJson;
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
use tastecheck_core::RecipeContent;

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    request_body = RecipeContent,
    responses(
        (status = 200, description = "Recipe content replaced", body = RecipeIdResponse),
        (status = 400, description = "Invalid recipe content", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "Recipe is verified and can no longer be edited", body = ErrorResponse),
        (status = 500, description = "Recipe could not be saved; nothing was changed", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ApiJson(content): ApiJson<RecipeContent>,
) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    let dropped_media =
        match writer::update_recipe(&mut conn, id, &actor, &content, state.write_timeout) {
            Ok(urls) => urls,
            Err(e) => return e.into_response(),
        };
    drop(conn);

    if !dropped_media.is_empty() {
        let report = cleanup_media(state.media.as_ref(), &dropped_media).await;
        tracing::debug!(
            recipe_id = id,
            removed = report.removed,
            failed = report.failed,
            "replaced media cleaned up"
        );
    }

    Json(RecipeIdResponse { recipe_id: id }).into_response()
}
