//! Storage-free rules for the recipe review service.

pub mod access;
pub mod content;
pub mod error;
pub mod quantity;
pub mod reference;
pub mod types;
pub mod verification;

pub use access::{Actor, Capability};
pub use content::{
    IngredientLine, MediaItem, QuantityInput, RecipeContent, ValidatedContent,
    ValidatedIngredient, ValidatedMedia, ValidatedStep,
};
pub use error::{AccessError, TransitionError, UnresolvedReference, ValidationError};
pub use quantity::{format_quantity, parse_quantity, QuantityError};
pub use reference::{ingredient_key, ReferenceMap, ReferencePlan};
pub use types::{MediaType, NutritionSource, Role, VerificationStatus};
pub use verification::{plan_transition, ReviewEvent, ReviewerLink, Transition};
