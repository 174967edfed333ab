use super::RecipeIdResponse;
use crate::api::json::ApiJson;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::get_conn;
use crate::recipes::writer;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tastecheck_core::RecipeContent;

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = RecipeContent,
    responses(
        (status = 201, description = "Recipe created and waiting for review", body = RecipeIdResponse),
        (status = 400, description = "Invalid recipe content", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only recipe developers can create recipes", body = ErrorResponse),
        (status = 500, description = "Recipe could not be saved", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    ApiJson(content): ApiJson<RecipeContent>,
) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    match writer::create_recipe(&mut conn, &actor, &content, state.write_timeout) {
        Ok(recipe_id) => {
            (StatusCode::CREATED, Json(RecipeIdResponse { recipe_id })).into_response()
        }
        Err(e) => e.into_response(),
    }
}
