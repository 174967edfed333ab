pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod reviews;
pub mod update;
pub mod update_content;
pub mod update_status;

use crate::AppState;
use axum::routing::{get, patch, post};
use axum::Router;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route(
            "/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route("/{id}/update-status", patch(update_status::update_status))
        .route("/{id}/update", patch(update_content::update_content))
        .route("/{id}/reviews", post(reviews::create_review))
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIdResponse {
    pub recipe_id: i32,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        update_status::update_status,
        update_content::update_content,
        reviews::create_review,
    ),
    components(schemas(
        RecipeIdResponse,
        tastecheck_core::RecipeContent,
        tastecheck_core::IngredientLine,
        tastecheck_core::QuantityInput,
        tastecheck_core::MediaItem,
        tastecheck_core::MediaType,
        tastecheck_core::VerificationStatus,
        tastecheck_core::NutritionSource,
        crate::recipes::projection::RecipeDetail,
        crate::recipes::projection::RecipeSummary,
        crate::recipes::projection::ListScope,
        crate::recipes::review_content::ReviewContentPatch,
        crate::recipes::review_content::NutritionInput,
        list::ListRecipesResponse,
        list::PaginationMetadata,
        delete::DeleteRecipeResponse,
        update_status::UpdateStatusRequest,
        update_status::UpdateStatusResponse,
        reviews::CreateReviewRequest,
        reviews::CreateReviewResponse,
    ))
)]
pub struct ApiDoc;
