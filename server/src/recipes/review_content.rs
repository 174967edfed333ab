//! Review-side content: health tips, nutrition and tags.
//!
//! These edits never change a recipe's status and are frozen once the recipe
//! is verified, like the rest of its content.

use crate::auth::lock_recipe_access;
use crate::error::AppError;
use crate::models::{NewNutritionalInformation, NewRecipeTag};
use crate::schema::{nutritional_information, recipe_tags, recipes, tags};
use bigdecimal::{BigDecimal, RoundingMode};
use chrono::Utc;
use diesel::prelude::*;
use serde::Deserialize;
use std::collections::BTreeSet;
use tastecheck_core::{Actor, Capability, NutritionSource, ValidationError};
use utoipa::ToSchema;

const NUTRITION_SCALE: i64 = 2;
/// NUMERIC(10,2) holds values below 10^8.
const NUTRITION_MAX: f64 = 100_000_000.0;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewContentPatch {
    /// Nutritionist guidance. An empty string clears it.
    #[serde(default)]
    pub health_tips: Option<String>,
    #[serde(default)]
    pub nutritional_info: Option<NutritionInput>,
    /// Replaces the recipe's tags when present.
    #[serde(default)]
    pub tags: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NutritionInput {
    pub calories: Option<f64>,
    pub protein_grams: Option<f64>,
    pub carbohydrates_grams: Option<f64>,
    pub fat_grams: Option<f64>,
    pub fiber_grams: Option<f64>,
    pub sugar_grams: Option<f64>,
    pub sodium_milligrams: Option<f64>,
}

/// [`NutritionInput`] checked and converted to column values.
#[derive(Debug, Clone, PartialEq)]
struct NutritionValues {
    calories: Option<BigDecimal>,
    protein_grams: Option<BigDecimal>,
    carbohydrates_grams: Option<BigDecimal>,
    fat_grams: Option<BigDecimal>,
    fiber_grams: Option<BigDecimal>,
    sugar_grams: Option<BigDecimal>,
    sodium_milligrams: Option<BigDecimal>,
}

impl NutritionInput {
    fn validate(&self) -> Result<NutritionValues, ValidationError> {
        let mut problems = Vec::new();
        let mut field = |name: &str, value: Option<f64>| -> Option<BigDecimal> {
            let value = value?;
            if !value.is_finite() || value < 0.0 {
                problems.push(format!("{name} must be a non-negative number"));
                return None;
            }
            if value >= NUTRITION_MAX {
                problems.push(format!("{name} is too large"));
                return None;
            }
            BigDecimal::try_from(value)
                .ok()
                .map(|d| d.with_scale_round(NUTRITION_SCALE, RoundingMode::HalfUp))
        };

        let values = NutritionValues {
            calories: field("calories", self.calories),
            protein_grams: field("proteinGrams", self.protein_grams),
            carbohydrates_grams: field("carbohydratesGrams", self.carbohydrates_grams),
            fat_grams: field("fatGrams", self.fat_grams),
            fiber_grams: field("fiberGrams", self.fiber_grams),
            sugar_grams: field("sugarGrams", self.sugar_grams),
            sodium_milligrams: field("sodiumMilligrams", self.sodium_milligrams),
        };

        if problems.is_empty() {
            Ok(values)
        } else {
            Err(ValidationError { problems })
        }
    }
}

/// Apply a review-content patch.
///
/// The recipe's author and any nutritionist may call this; everyone else
/// gets a 404. Health tips are nutritionist-only.
pub fn apply_review_content(
    conn: &mut PgConnection,
    recipe_id: i32,
    actor: &Actor,
    patch: &ReviewContentPatch,
) -> Result<(), AppError> {
    conn.transaction::<_, AppError, _>(|conn| {
        let access = lock_recipe_access(conn, recipe_id)?;
        if !(actor.is_owner(access.author_id) || actor.has(Capability::ReviewRecipes)) {
            return Err(AppError::NotFound);
        }
        if patch.health_tips.is_some() {
            actor.require(Capability::WriteHealthTips)?;
        }
        if access.status.is_locked() {
            return Err(AppError::RecipeLocked);
        }

        let nutrition = patch
            .nutritional_info
            .as_ref()
            .map(NutritionInput::validate)
            .transpose()?;
        let tag_ids = patch.tags.as_deref().map(distinct_tags);
        if let Some(tag_ids) = &tag_ids {
            ensure_tags_exist(conn, tag_ids)?;
        }

        let now = Utc::now();

        if let Some(tips) = &patch.health_tips {
            let tips = Some(tips.trim()).filter(|t| !t.is_empty());
            diesel::update(recipes::table.find(recipe_id))
                .set(recipes::health_tips.eq(tips))
                .execute(conn)?;
        }

        if let Some(values) = &nutrition {
            let source = if actor.has(Capability::ReviewRecipes) {
                NutritionSource::VerifiedNutritionist
            } else {
                NutritionSource::EstimatedApi
            };
            let row = NewNutritionalInformation {
                recipe_id,
                calories: values.calories.as_ref(),
                protein_grams: values.protein_grams.as_ref(),
                carbohydrates_grams: values.carbohydrates_grams.as_ref(),
                fat_grams: values.fat_grams.as_ref(),
                fiber_grams: values.fiber_grams.as_ref(),
                sugar_grams: values.sugar_grams.as_ref(),
                sodium_milligrams: values.sodium_milligrams.as_ref(),
                data_source: source.as_str(),
            };
            diesel::insert_into(nutritional_information::table)
                .values(&row)
                .on_conflict(nutritional_information::recipe_id)
                .do_update()
                .set((&row, nutritional_information::updated_at.eq(now)))
                .execute(conn)?;
        }

        if let Some(tag_ids) = &tag_ids {
            diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
                .execute(conn)?;
            let rows: Vec<NewRecipeTag> = tag_ids
                .iter()
                .map(|&tag_id| NewRecipeTag { recipe_id, tag_id })
                .collect();
            if !rows.is_empty() {
                diesel::insert_into(recipe_tags::table)
                    .values(&rows)
                    .execute(conn)?;
            }
        }

        diesel::update(recipes::table.find(recipe_id))
            .set(recipes::updated_at.eq(now))
            .execute(conn)?;

        Ok(())
    })?;

    tracing::info!(
        recipe_id,
        actor_id = actor.user_id,
        health_tips = patch.health_tips.is_some(),
        nutrition = patch.nutritional_info.is_some(),
        tags = patch.tags.is_some(),
        "recipe review content updated"
    );
    Ok(())
}

fn distinct_tags(ids: &[i32]) -> Vec<i32> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

fn ensure_tags_exist(conn: &mut PgConnection, tag_ids: &[i32]) -> Result<(), AppError> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    let known: BTreeSet<i32> = tags::table
        .filter(tags::id.eq_any(tag_ids))
        .select(tags::id)
        .load::<i32>(conn)?
        .into_iter()
        .collect();

    let problems: Vec<String> = tag_ids
        .iter()
        .filter(|id| !known.contains(id))
        .map(|id| format!("Unknown tag id {id}"))
        .collect();
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { problems }.into())
    }
}
