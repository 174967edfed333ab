use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tastecheck_core::{Actor, Role};

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// `None` when the stored role is not one this server understands.
    pub fn actor(&self) -> Option<Actor> {
        Role::parse(&self.role).map(|role| Actor::new(self.id, role))
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub full_name: &'a str,
    pub role: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession<'a> {
    pub user_id: i32,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub id: i32,
    pub author_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub cooking_time_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub status: String,
    pub health_tips: Option<String>,
    pub verified_by_id: Option<i32>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub author_id: i32,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub cooking_time_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub status: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(treat_none_as_null = true)]
pub struct RecipeScalars<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub cooking_time_minutes: Option<i32>,
    pub servings: Option<i32>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::ingredients)]
pub struct NewIngredient<'a> {
    pub name: &'a str,
    pub name_key: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::measurement_units)]
pub struct NewMeasurementUnit<'a> {
    pub unit_name: &'a str,
    pub abbreviation: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_ingredients)]
pub struct NewRecipeIngredient<'a> {
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub unit_id: Option<i32>,
    pub quantity: &'a BigDecimal,
    pub notes: Option<&'a str>,
    pub position: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::preparation_steps)]
pub struct NewPreparationStep<'a> {
    pub recipe_id: i32,
    pub step_number: i32,
    pub instruction: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::media)]
pub struct NewMedia<'a> {
    pub recipe_id: i32,
    pub media_type: &'a str,
    pub url: &'a str,
    pub caption: Option<&'a str>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_tags)]
pub struct NewRecipeTag {
    pub recipe_id: i32,
    pub tag_id: i32,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::nutritional_information)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct NutritionalInformation {
    pub recipe_id: i32,
    pub calories: Option<BigDecimal>,
    pub protein_grams: Option<BigDecimal>,
    pub carbohydrates_grams: Option<BigDecimal>,
    pub fat_grams: Option<BigDecimal>,
    pub fiber_grams: Option<BigDecimal>,
    pub sugar_grams: Option<BigDecimal>,
    pub sodium_milligrams: Option<BigDecimal>,
    pub data_source: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::nutritional_information)]
#[diesel(primary_key(recipe_id))]
#[diesel(treat_none_as_null = true)]
pub struct NewNutritionalInformation<'a> {
    pub recipe_id: i32,
    pub calories: Option<&'a BigDecimal>,
    pub protein_grams: Option<&'a BigDecimal>,
    pub carbohydrates_grams: Option<&'a BigDecimal>,
    pub fat_grams: Option<&'a BigDecimal>,
    pub fiber_grams: Option<&'a BigDecimal>,
    pub sugar_grams: Option<&'a BigDecimal>,
    pub sodium_milligrams: Option<&'a BigDecimal>,
    pub data_source: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::reviews)]
pub struct NewReview<'a> {
    pub recipe_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub comment: Option<&'a str>,
}
