use super::RecipeIdResponse;
use crate::api::json::ApiJson;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::recipes::review_content::{apply_review_content, ReviewContentPatch};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

#[utoipa::path(
    patch,
    path = "/api/recipes/{id}/update",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    request_body = ReviewContentPatch,
    responses(
        (status = 200, description = "Health tips, nutrition or tags saved", body = RecipeIdResponse),
        (status = 400, description = "Invalid nutrition values or unknown tags", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only nutritionists can write health tips", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 409, description = "Recipe is verified and can no longer be edited", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_content(
    AuthUser(actor): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
    ApiJson(patch): ApiJson<ReviewContentPatch>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match apply_review_content(&mut conn, id, &actor, &patch) {
        Ok(()) => Json(RecipeIdResponse { recipe_id: id }).into_response(),
        Err(e) => e.into_response(),
    }
}
