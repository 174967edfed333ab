//! Shared ingredient and unit dictionaries.
//!
//! The writer builds a [`ReferencePlan`] from validated lines, the database
//! layer upserts it and hands back a [`ReferenceMap`], and every ingredient
//! line is then resolved against that map. A line that cannot be resolved
//! aborts the whole write.

use crate::content::ValidatedIngredient;
use crate::error::UnresolvedReference;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Natural key of a shared ingredient. Ingredient names are unique
/// case-insensitively, so "Flour" and "flour" are the same row.
pub fn ingredient_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Distinct ingredients and units referenced by one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferencePlan {
    /// key -> display name of the first occurrence
    ingredients: BTreeMap<String, String>,
    units: BTreeSet<String>,
}

impl ReferencePlan {
    pub fn from_lines(lines: &[ValidatedIngredient]) -> Self {
        let mut plan = Self::default();
        for line in lines {
            plan.ingredients
                .entry(line.key.clone())
                .or_insert_with(|| line.name.clone());
            if let Some(unit) = &line.unit {
                plan.units.insert(unit.clone());
            }
        }
        plan
    }

    /// `(key, display name)` pairs in key order.
    pub fn ingredients(&self) -> impl Iterator<Item = (&str, &str)> {
        self.ingredients
            .iter()
            .map(|(key, name)| (key.as_str(), name.as_str()))
    }

    pub fn ingredient_keys(&self) -> Vec<&str> {
        self.ingredients.keys().map(String::as_str).collect()
    }

    pub fn units(&self) -> Vec<&str> {
        self.units.iter().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty() && self.units.is_empty()
    }
}

/// Resolved identities for a [`ReferencePlan`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceMap {
    ingredients: HashMap<String, i32>,
    units: HashMap<String, i32>,
}

impl ReferenceMap {
    pub fn insert_ingredient(&mut self, key: impl Into<String>, id: i32) {
        self.ingredients.insert(key.into(), id);
    }

    pub fn insert_unit(&mut self, unit_name: impl Into<String>, id: i32) {
        self.units.insert(unit_name.into(), id);
    }

    pub fn ingredient_id(&self, key: &str) -> Result<i32, UnresolvedReference> {
        self.ingredients
            .get(key)
            .copied()
            .ok_or_else(|| UnresolvedReference::Ingredient(key.to_string()))
    }

    /// Lines without a unit resolve to `None`; a named unit must be present.
    pub fn unit_id(&self, unit: Option<&str>) -> Result<Option<i32>, UnresolvedReference> {
        match unit {
            None => Ok(None),
            Some(name) => self
                .units
                .get(name)
                .copied()
                .map(Some)
                .ok_or_else(|| UnresolvedReference::Unit(name.to_string())),
        }
    }

    /// `(ingredient_id, unit_id)` for one line.
    pub fn resolve(
        &self,
        line: &ValidatedIngredient,
    ) -> Result<(i32, Option<i32>), UnresolvedReference> {
        Ok((
            self.ingredient_id(&line.key)?,
            self.unit_id(line.unit.as_deref())?,
        ))
    }
}
