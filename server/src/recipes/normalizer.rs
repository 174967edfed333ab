//! Shared ingredient and unit rows.
//!
//! Concurrent writers may introduce the same new ingredient at once. Inserts
//! use `ON CONFLICT DO NOTHING` and ids are always read back afterwards, so
//! the loser of the race reuses the winner's row instead of failing.
//!
//! An insert can wait on another writer's uncommitted row with the same key,
//! so every statement runs under the write's deadline.

use crate::error::AppError;
use crate::models::{NewIngredient, NewMeasurementUnit};
use crate::recipes::deadline::WriteDeadline;
use crate::schema::{ingredients, measurement_units};
use diesel::prelude::*;
use tastecheck_core::{ReferenceMap, ReferencePlan};

pub fn resolve_references(
    conn: &mut PgConnection,
    plan: &ReferencePlan,
    deadline: &WriteDeadline,
) -> Result<ReferenceMap, AppError> {
    let mut map = ReferenceMap::default();

    let new_ingredients: Vec<NewIngredient> = plan
        .ingredients()
        .map(|(key, name)| NewIngredient {
            name,
            name_key: key,
        })
        .collect();

    if !new_ingredients.is_empty() {
        deadline.check(conn, "insert ingredients")?;
        diesel::insert_into(ingredients::table)
            .values(&new_ingredients)
            .on_conflict(ingredients::name_key)
            .do_nothing()
            .execute(conn)?;

        deadline.check(conn, "select ingredients")?;
        let rows: Vec<(i32, String)> = ingredients::table
            .filter(ingredients::name_key.eq_any(plan.ingredient_keys()))
            .select((ingredients::id, ingredients::name_key))
            .load(conn)?;
        for (id, key) in rows {
            map.insert_ingredient(key, id);
        }
    }

    let units = plan.units();
    if !units.is_empty() {
        // New units get the submitted text as their abbreviation too.
        let new_units: Vec<NewMeasurementUnit> = units
            .iter()
            .map(|unit| NewMeasurementUnit {
                unit_name: unit,
                abbreviation: unit,
            })
            .collect();

        deadline.check(conn, "insert units")?;
        diesel::insert_into(measurement_units::table)
            .values(&new_units)
            .on_conflict(measurement_units::unit_name)
            .do_nothing()
            .execute(conn)?;

        deadline.check(conn, "select units")?;
        let rows: Vec<(i32, String)> = measurement_units::table
            .filter(measurement_units::unit_name.eq_any(units.clone()))
            .select((measurement_units::id, measurement_units::unit_name))
            .load(conn)?;
        for (id, name) in rows {
            map.insert_unit(name, id);
        }
    }

    tracing::debug!(
        ingredients = plan.ingredient_keys().len(),
        units = units.len(),
        "resolved recipe references"
    );

    Ok(map)
}
