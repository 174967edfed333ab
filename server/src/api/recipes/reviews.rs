use crate::api::json::ApiJson;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::recipes::ratings::submit_rating;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    /// 1 to 5
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewResponse {
    pub review_id: i32,
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/reviews",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    request_body = CreateReviewRequest,
    responses(
        (status = 200, description = "Rating saved; replaces the caller's earlier rating", body = CreateReviewResponse),
        (status = 400, description = "Rating out of range", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_review(
    AuthUser(actor): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
    ApiJson(request): ApiJson<CreateReviewRequest>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match submit_rating(&mut conn, id, &actor, request.rating, request.comment.as_deref()) {
        Ok(review_id) => Json(CreateReviewResponse { review_id }).into_response(),
        Err(e) => e.into_response(),
    }
}
