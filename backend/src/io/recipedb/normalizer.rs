//! Maps loosely-shaped recipe JSON onto [`Recipe`].
//!
//! The recipe API is inconsistent about field names (`Calories` vs
//! `calories`, `Proteins` vs `protein`) and about how lists are wrapped.
//! Each canonical field has an ordered alias list; the first alias present
//! with a non-null value wins.

use serde_json::{Map, Value};
use shared::Recipe;
use tracing::debug;

use crate::storage::generate_id;

const ID_KEYS: &[&str] = &["recipe_id", "id", "Recipe_id"];
const NAME_KEYS: &[&str] = &["name", "recipe_name", "Recipe_name", "title"];
const CALORIE_KEYS: &[&str] = &["Calories", "calories", "cal", "cal_val"];
const PROTEIN_KEYS: &[&str] = &["Proteins", "protein", "proteins", "Protein"];
const FAT_KEYS: &[&str] = &["Fat", "fat", "fats", "Fats"];
const CARB_KEYS: &[&str] = &["Carbs", "carbs", "carbohydrates", "Carbohydrates"];
const FIBER_KEYS: &[&str] = &["Fiber", "fiber", "fibre", "Fibre"];
const IRON_KEYS: &[&str] = &["Iron", "iron"];
const INGREDIENT_KEYS: &[&str] = &["ingredients", "ing", "Ingredients", "ingredient"];
const INSTRUCTION_KEYS: &[&str] = &["instructions", "steps", "Instructions", "recipe_instruction"];
const CUISINE_KEYS: &[&str] = &["cuisine", "Cuisine", "region", "Region"];
const CATEGORY_KEYS: &[&str] = &["category", "Category", "course"];
const COST_KEYS: &[&str] = &["cost_per_serving", "costPerServing", "cost", "Cost"];
const SCORE_KEYS: &[&str] = &["nutritionScore", "nutrition_score"];

/// Envelope keys that may hold the recipe array, in lookup order
const LIST_ENVELOPES: &[&str] = &["recipes", "data", "results", "items"];

pub const DEFAULT_RECIPE_NAME: &str = "Recipe";
pub const DEFAULT_CUISINE: &str = "local";
pub const DEFAULT_CATEGORY: &str = "general";

/// Milligrams of iron at which a recipe counts as iron-rich
pub const IRON_RICH_THRESHOLD: f64 = 3.0;

fn first_present<'a>(raw: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| !value.is_null())
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Numeric field, zero when absent or unparsable
fn number_field(raw: &Map<String, Value>, keys: &[&str]) -> f64 {
    first_present(raw, keys).and_then(as_number).unwrap_or(0.0)
}

fn text_field(raw: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    match first_present(raw, keys)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// List field. Strings are split on `separator`.
fn list_field(raw: &Map<String, Value>, keys: &[&str], separator: char) -> Vec<String> {
    match first_present(raw, keys) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(s)) => s
            .split(separator)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Heuristic 0-100 score used when the source does not provide one
pub fn estimate_nutrition_score(protein: f64, calories: f64) -> f64 {
    (protein * 5.0 + calories / 50.0).round().min(100.0)
}

pub fn normalize_recipe(raw: &Map<String, Value>) -> Recipe {
    let calories = number_field(raw, CALORIE_KEYS);
    let protein = number_field(raw, PROTEIN_KEYS);
    let iron = number_field(raw, IRON_KEYS);

    let nutrition_score = first_present(raw, SCORE_KEYS)
        .and_then(as_number)
        .unwrap_or_else(|| estimate_nutrition_score(protein, calories));

    Recipe {
        id: text_field(raw, ID_KEYS).unwrap_or_else(generate_id),
        name: text_field(raw, NAME_KEYS).unwrap_or_else(|| DEFAULT_RECIPE_NAME.to_string()),
        calories,
        protein,
        fat: number_field(raw, FAT_KEYS),
        carbs: number_field(raw, CARB_KEYS),
        fiber: number_field(raw, FIBER_KEYS),
        iron,
        ingredients: list_field(raw, INGREDIENT_KEYS, ','),
        instructions: list_field(raw, INSTRUCTION_KEYS, '\n'),
        cuisine: text_field(raw, CUISINE_KEYS).unwrap_or_else(|| DEFAULT_CUISINE.to_string()),
        category: text_field(raw, CATEGORY_KEYS).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        nutrition_score,
        cost_per_serving: first_present(raw, COST_KEYS).and_then(as_number),
        is_iron_rich: iron >= IRON_RICH_THRESHOLD,
        is_seasonal: false,
    }
}

/// Pull the list of raw recipe objects out of a response body
pub fn unwrap_envelope(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let envelope = LIST_ENVELOPES
                .iter()
                .find(|key| matches!(map.get(**key), Some(Value::Array(_))));
            if let Some(Value::Array(items)) = envelope.and_then(|key| map.remove(*key)) {
                return items;
            }
            match map.remove("recipe") {
                Some(Value::Null) | None => Vec::new(),
                Some(single) => vec![single],
            }
        }
        _ => Vec::new(),
    }
}

/// Normalize every recipe object in a response body, skipping non-objects
pub fn normalize_response(body: Value) -> Vec<Recipe> {
    unwrap_envelope(body)
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(raw) => Some(normalize_recipe(&raw)),
            other => {
                debug!("Skipping non-object recipe entry: {}", other);
                None
            }
        })
        .collect()
}
