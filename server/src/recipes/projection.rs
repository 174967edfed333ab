//! The read model: one recipe in full, and paginated summaries.

use crate::auth::{load_recipe_access, parse_status};
use crate::error::AppError;
use crate::models::{NutritionalInformation, Recipe};
use crate::raw_sql::{average_rating, count_over};
use crate::schema::{
    ingredients, measurement_units, media, nutritional_information, preparation_steps,
    recipe_ingredients, recipe_tags, recipes, reviews, tag_types, tags, users,
};
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use tastecheck_core::{
    format_quantity, Actor, Capability, MediaType, NutritionSource, VerificationStatus,
};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientDetail {
    pub name: String,
    /// Decimal string, trailing zeros removed ("0.5", "2").
    pub quantity: String,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepDetail {
    pub step_number: i32,
    pub instruction: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaDetail {
    pub id: i32,
    pub media_type: MediaType,
    pub url: String,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagDetail {
    pub id: i32,
    pub name: String,
    pub tag_type: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NutritionDetail {
    pub calories: Option<f64>,
    pub protein_grams: Option<f64>,
    pub carbohydrates_grams: Option<f64>,
    pub fat_grams: Option<f64>,
    pub fiber_grams: Option<f64>,
    pub sugar_grams: Option<f64>,
    pub sodium_milligrams: Option<f64>,
    pub data_source: Option<NutritionSource>,
    pub updated_at: DateTime<Utc>,
}

impl From<NutritionalInformation> for NutritionDetail {
    fn from(row: NutritionalInformation) -> Self {
        let number = |value: Option<BigDecimal>| value.and_then(|v| v.to_f64());
        Self {
            calories: number(row.calories),
            protein_grams: number(row.protein_grams),
            carbohydrates_grams: number(row.carbohydrates_grams),
            fat_grams: number(row.fat_grams),
            fiber_grams: number(row.fiber_grams),
            sugar_grams: number(row.sugar_grams),
            sodium_milligrams: number(row.sodium_milligrams),
            data_source: NutritionSource::parse(&row.data_source),
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub cooking_time_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub status: VerificationStatus,
    pub health_tips: Option<String>,
    pub author: UserSummary,
    pub verified_by: Option<UserSummary>,
    pub verified_at: Option<DateTime<Utc>>,
    pub ingredients: Vec<IngredientDetail>,
    pub steps: Vec<StepDetail>,
    pub media: Vec<MediaDetail>,
    pub tags: Vec<TagDetail>,
    pub nutrition: Option<NutritionDetail>,
    /// Mean rating, absent until someone rates the recipe.
    pub average_rating: Option<f64>,
    pub review_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Load a recipe the actor is allowed to see. Hidden recipes are reported
/// as missing.
pub fn load_visible_recipe(
    conn: &mut PgConnection,
    recipe_id: i32,
    actor: &Actor,
) -> Result<RecipeDetail, AppError> {
    let access = load_recipe_access(conn, recipe_id)?;
    actor.require_view(access.author_id, access.status)?;
    load_recipe_detail(conn, recipe_id)
}

pub fn load_recipe_detail(conn: &mut PgConnection, recipe_id: i32) -> Result<RecipeDetail, AppError> {
    let recipe: Recipe = recipes::table
        .find(recipe_id)
        .select(Recipe::as_select())
        .first(conn)?;
    let status = parse_status(&recipe.status)?;

    let author = load_user_summary(conn, recipe.author_id)?;
    let verified_by = match recipe.verified_by_id {
        Some(id) => Some(load_user_summary(conn, id)?),
        None => None,
    };

    let ingredients = recipe_ingredients::table
        .inner_join(ingredients::table)
        .left_join(measurement_units::table)
        .filter(recipe_ingredients::recipe_id.eq(recipe_id))
        .order(recipe_ingredients::position.asc())
        .select((
            ingredients::name,
            recipe_ingredients::quantity,
            measurement_units::unit_name.nullable(),
            recipe_ingredients::notes,
        ))
        .load::<(String, BigDecimal, Option<String>, Option<String>)>(conn)?
        .into_iter()
        .map(|(name, quantity, unit, notes)| IngredientDetail {
            name,
            quantity: format_quantity(&quantity),
            unit,
            notes,
        })
        .collect();

    let steps = preparation_steps::table
        .filter(preparation_steps::recipe_id.eq(recipe_id))
        .order(preparation_steps::step_number.asc())
        .select((preparation_steps::step_number, preparation_steps::instruction))
        .load::<(i32, String)>(conn)?
        .into_iter()
        .map(|(step_number, instruction)| StepDetail {
            step_number,
            instruction,
        })
        .collect();

    let media = media::table
        .filter(media::recipe_id.eq(recipe_id))
        .order(media::id.asc())
        .select((media::id, media::media_type, media::url, media::caption))
        .load::<(i32, String, String, Option<String>)>(conn)?
        .into_iter()
        .filter_map(|(id, media_type, url, caption)| {
            Some(MediaDetail {
                id,
                media_type: MediaType::parse(&media_type)?,
                url,
                caption,
            })
        })
        .collect();

    let tags = recipe_tags::table
        .inner_join(tags::table.inner_join(tag_types::table))
        .filter(recipe_tags::recipe_id.eq(recipe_id))
        .order((tag_types::name.asc(), tags::name.asc()))
        .select((tags::id, tags::name, tag_types::name))
        .load::<(i32, String, String)>(conn)?
        .into_iter()
        .map(|(id, name, tag_type)| TagDetail { id, name, tag_type })
        .collect();

    let nutrition = nutritional_information::table
        .find(recipe_id)
        .select(NutritionalInformation::as_select())
        .first(conn)
        .optional()?
        .map(NutritionDetail::from);

    let (average_rating, review_count) = reviews::table
        .filter(reviews::recipe_id.eq(recipe_id))
        .select((average_rating(), count_star()))
        .first::<(Option<f64>, i64)>(conn)?;

    Ok(RecipeDetail {
        id: recipe.id,
        title: recipe.title,
        description: recipe.description,
        cooking_time_minutes: recipe.cooking_time_minutes,
        servings: recipe.servings,
        status,
        health_tips: recipe.health_tips,
        author,
        verified_by,
        verified_at: recipe.verified_at,
        ingredients,
        steps,
        media,
        tags,
        nutrition,
        average_rating,
        review_count,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
    })
}

fn load_user_summary(conn: &mut PgConnection, user_id: i32) -> QueryResult<UserSummary> {
    users::table
        .find(user_id)
        .select((users::id, users::username, users::full_name))
        .first::<(i32, String, String)>(conn)
        .map(|(id, username, full_name)| UserSummary {
            id,
            username,
            full_name,
        })
}

/// Which recipes a listing covers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ListScope {
    /// Verified recipes, visible to everyone.
    #[default]
    Public,
    /// The caller's own recipes in any status.
    Mine,
    /// Recipes waiting for a nutritionist, oldest first.
    ReviewQueue,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub cooking_time_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub status: VerificationStatus,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable)]
struct RecipeSummaryRow {
    id: i32,
    title: String,
    description: Option<String>,
    cooking_time_minutes: Option<i32>,
    servings: Option<i32>,
    status: String,
    author_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Total count of all matching rows (from window function)
    total_count: i64,
}

#[derive(Debug, Clone)]
pub struct RecipePage {
    pub recipes: Vec<RecipeSummary>,
    pub total: i64,
}

pub fn list_recipes(
    conn: &mut PgConnection,
    actor: &Actor,
    scope: ListScope,
    limit: i64,
    offset: i64,
) -> Result<RecipePage, AppError> {
    let query = recipes::table.into_boxed();
    let query = match scope {
        ListScope::Public => query
            .filter(recipes::status.eq(VerificationStatus::Verified.as_str()))
            .order((recipes::updated_at.desc(), recipes::id.desc())),
        ListScope::Mine => query
            .filter(recipes::author_id.eq(actor.user_id))
            .order((recipes::updated_at.desc(), recipes::id.desc())),
        ListScope::ReviewQueue => {
            actor.require(Capability::ReviewRecipes)?;
            query
                .filter(recipes::status.eq(VerificationStatus::PendingVerification.as_str()))
                .order((recipes::created_at.asc(), recipes::id.asc()))
        }
    };

    let rows: Vec<RecipeSummaryRow> = query
        .select((
            recipes::id,
            recipes::title,
            recipes::description,
            recipes::cooking_time_minutes,
            recipes::servings,
            recipes::status,
            recipes::author_id,
            recipes::created_at,
            recipes::updated_at,
            count_over(),
        ))
        .limit(limit)
        .offset(offset)
        .load(conn)?;

    let total = rows.first().map(|r| r.total_count).unwrap_or(0);
    let recipes = rows
        .into_iter()
        .map(|row| {
            Ok(RecipeSummary {
                id: row.id,
                title: row.title,
                description: row.description,
                cooking_time_minutes: row.cooking_time_minutes,
                servings: row.servings,
                status: parse_status(&row.status)?,
                author_id: row.author_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(RecipePage { recipes, total })
}
