use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::recipes::projection::{self, ListScope, RecipeSummary};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// public (verified only, default), mine, or review_queue (nutritionists)
    #[serde(default)]
    pub scope: ListScope,
    /// Number of items to return (default: 20, max: 100)
    pub limit: Option<i64>,
    /// Summaries to skip, default 0
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMetadata {
    /// Recipes matching the scope across all pages
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    pub pagination: PaginationMetadata,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Recipe summaries", body = ListRecipesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Review queue requires the nutritionist role", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_recipes(
    AuthUser(actor): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListRecipesParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let mut conn = get_conn!(pool);

    match projection::list_recipes(&mut conn, &actor, params.scope, limit, offset) {
        Ok(page) => Json(ListRecipesResponse {
            recipes: page.recipes,
            pagination: PaginationMetadata {
                total: page.total,
                limit,
                offset,
            },
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}
