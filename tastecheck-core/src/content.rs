//! Recipe content as submitted by an author, and its validated form.

use crate::error::ValidationError;
use crate::quantity::{parse_quantity, QuantityError};
use crate::reference::ingredient_key;
use crate::types::MediaType;
use bigdecimal::BigDecimal;
use serde::Deserialize;
use std::collections::HashSet;
use utoipa::ToSchema;

/// Column widths, in characters, of the tables the writer fills.
pub const MAX_TITLE_CHARS: usize = 255;
pub const MAX_INGREDIENT_NAME_CHARS: usize = 255;
pub const MAX_UNIT_CHARS: usize = 64;
pub const MAX_MEDIA_URL_CHARS: usize = 2048;

/// Body of a recipe create or full update.
///
/// `media` distinguishes omission from an empty list: `None` leaves the
/// recipe's media alone on update, `Some(vec![])` removes all of it.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeContent {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cooking_time_minutes: Option<i32>,
    #[serde(default)]
    pub servings: Option<i32>,
    #[serde(default)]
    pub ingredients: Vec<IngredientLine>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub media: Option<Vec<MediaItem>>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientLine {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: Option<QuantityInput>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Forms send quantities as text; API clients often send bare numbers.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum QuantityInput {
    Number(f64),
    Text(String),
}

impl QuantityInput {
    pub fn as_text(&self) -> String {
        match self {
            QuantityInput::Number(n) => n.to_string(),
            QuantityInput::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for QuantityInput {
    fn from(s: &str) -> Self {
        QuantityInput::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub media_type: MediaType,
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedContent {
    pub title: String,
    pub description: Option<String>,
    pub cooking_time_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub ingredients: Vec<ValidatedIngredient>,
    pub steps: Vec<ValidatedStep>,
    pub media: Option<Vec<ValidatedMedia>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedIngredient {
    /// 1-based position among the kept lines.
    pub position: i32,
    pub name: String,
    /// Case-insensitive natural key of the shared ingredient.
    pub key: String,
    pub quantity: BigDecimal,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedStep {
    pub step_number: i32,
    pub instruction: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMedia {
    pub media_type: MediaType,
    pub url: String,
    pub caption: Option<String>,
}

impl RecipeContent {
    /// Trim and check everything the writer needs. Runs before any
    /// transaction is opened; all problems are collected.
    pub fn validate(&self) -> Result<ValidatedContent, ValidationError> {
        let mut problems = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            problems.push("Title cannot be empty".to_string());
        } else if too_long(title, MAX_TITLE_CHARS) {
            problems.push(format!(
                "Title must be at most {MAX_TITLE_CHARS} characters"
            ));
        }

        if matches!(self.cooking_time_minutes, Some(minutes) if minutes <= 0) {
            problems.push("Cooking time must be a positive number of minutes".to_string());
        }
        if matches!(self.servings, Some(servings) if servings <= 0) {
            problems.push("Servings must be a positive number".to_string());
        }

        let ingredients = validate_ingredients(&self.ingredients, &mut problems);
        let steps = number_steps(&self.steps);
        if steps.is_empty() {
            problems.push("At least one preparation step is required".to_string());
        }

        let media = self
            .media
            .as_ref()
            .map(|items| validate_media(items, &mut problems));

        if !problems.is_empty() {
            return Err(ValidationError { problems });
        }

        Ok(ValidatedContent {
            title: title.to_string(),
            description: non_blank(self.description.as_deref()),
            cooking_time_minutes: self.cooking_time_minutes,
            servings: self.servings,
            ingredients,
            steps,
            media,
        })
    }
}

fn validate_ingredients(
    lines: &[IngredientLine],
    problems: &mut Vec<String>,
) -> Vec<ValidatedIngredient> {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();

    // Blank rows are leftovers from the form and are dropped silently.
    for line in lines.iter().filter(|line| !line.name.trim().is_empty()) {
        let name = line.name.trim();
        let key = ingredient_key(name);

        // Lowercasing can lengthen a name, so the key is checked as well.
        if too_long(name, MAX_INGREDIENT_NAME_CHARS) || too_long(&key, MAX_INGREDIENT_NAME_CHARS)
        {
            problems.push(format!(
                "Ingredient names must be at most {MAX_INGREDIENT_NAME_CHARS} characters"
            ));
            seen.insert(key);
            continue;
        }

        if !seen.insert(key.clone()) {
            problems.push(format!("Ingredient '{}' is listed more than once", name));
            continue;
        }

        let raw_quantity = line
            .quantity
            .as_ref()
            .map(QuantityInput::as_text)
            .unwrap_or_default();
        let quantity = match parse_quantity(&raw_quantity) {
            Ok(quantity) => quantity,
            Err(QuantityError::Empty) => {
                problems.push(format!("Ingredient '{}' needs a quantity", name));
                continue;
            }
            Err(e) => {
                problems.push(format!("Ingredient '{}': {}", name, e));
                continue;
            }
        };

        let unit = non_blank(line.unit.as_deref());
        if let Some(unit) = unit.as_deref().filter(|u| too_long(u, MAX_UNIT_CHARS)) {
            problems.push(format!(
                "Ingredient '{}': unit '{}' is longer than {MAX_UNIT_CHARS} characters",
                name,
                unit.chars().take(16).collect::<String>()
            ));
            continue;
        }

        kept.push(ValidatedIngredient {
            position: kept.len() as i32 + 1,
            name: name.to_string(),
            key,
            quantity,
            unit,
            notes: non_blank(line.notes.as_deref()),
        });
    }

    if seen.is_empty() {
        problems.push("At least one ingredient is required".to_string());
    }

    kept
}

/// Drop blank steps and number the rest densely from 1 in submission order.
pub fn number_steps(steps: &[String]) -> Vec<ValidatedStep> {
    steps
        .iter()
        .map(|step| step.trim())
        .filter(|step| !step.is_empty())
        .enumerate()
        .map(|(index, instruction)| ValidatedStep {
            step_number: index as i32 + 1,
            instruction: instruction.to_string(),
        })
        .collect()
}

fn validate_media(items: &[MediaItem], problems: &mut Vec<String>) -> Vec<ValidatedMedia> {
    let mut kept = Vec::with_capacity(items.len());
    for item in items {
        let url = item.url.trim();
        if url.is_empty() {
            problems.push("Media url cannot be empty".to_string());
            continue;
        }
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            problems.push(format!("Media url '{}' must be an http(s) url", url));
            continue;
        }
        if too_long(url, MAX_MEDIA_URL_CHARS) {
            problems.push(format!(
                "Media urls must be at most {MAX_MEDIA_URL_CHARS} characters"
            ));
            continue;
        }
        kept.push(ValidatedMedia {
            media_type: item.media_type,
            url: url.to_string(),
            caption: non_blank(item.caption.as_deref()),
        });
    }
    kept
}

fn too_long(value: &str, max_chars: usize) -> bool {
    value.chars().count() > max_chars
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
