//! # REST API for Meal Recommendations
//!
//! Catalog recommendations by BMI category, optionally merged with live
//! recipe data, plus direct access to the live source.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use shared::{BmiCategory, RecipeListResponse};
use tracing::info;

use crate::domain::recipe_catalog::{get_recipes_for_category_name, RecipeFilter};
use crate::error::AppError;
use crate::AppState;

/// Query parameters for the recommendations endpoint
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationQuery {
    /// BMI category wire name; unknown names return the whole catalog
    pub category: String,
    pub cuisine: Option<String>,
    /// Recipe category such as "main course"
    pub meal_category: Option<String>,
    pub max_budget: Option<f64>,
    /// Merge in live recipes from the recipe API
    #[serde(default)]
    pub live: bool,
}

#[derive(Deserialize, Debug)]
pub struct LiveRecipeQuery {
    pub category: String,
}

/// Create a router for recipe related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recommendations", get(get_recommendations))
        .route("/live", get(get_live_recipes))
}

fn parse_category(name: &str) -> Result<BmiCategory, AppError> {
    BmiCategory::from_name(name)
        .ok_or_else(|| AppError::InvalidInput(format!("Unknown BMI category '{}'", name)))
}

/// Recommended recipes for a BMI category
pub async fn get_recommendations(
    State(state): State<AppState>,
    Query(query): Query<RecommendationQuery>,
) -> impl IntoResponse {
    info!("GET /api/recipes/recommendations - query: {:?}", query);

    let filter = RecipeFilter {
        cuisine: query.cuisine,
        category: query.meal_category,
        max_budget: query.max_budget,
    };

    let recipes = if query.live {
        match parse_category(&query.category) {
            Ok(category) => state.meal_planner.plan(category, &filter).await,
            Err(e) => return e.into_response(),
        }
    } else {
        filter.apply(get_recipes_for_category_name(&query.category))
    };

    Json(RecipeListResponse { recipes }).into_response()
}

/// Live recipes for a BMI category, empty when the recipe API is unavailable
pub async fn get_live_recipes(
    State(state): State<AppState>,
    Query(query): Query<LiveRecipeQuery>,
) -> impl IntoResponse {
    info!("GET /api/recipes/live - category: {}", query.category);

    match parse_category(&query.category) {
        Ok(category) => Json(RecipeListResponse {
            recipes: state.meal_planner.live_recipes(category).await,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}
