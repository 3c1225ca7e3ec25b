//! Builds the meal suggestion list for a child from live recipe data,
//! falling back to the built-in catalog.

use async_trait::async_trait;
use shared::{BmiCategory, Recipe};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::recipe_catalog::{get_recipes_for_category, RecipeFilter};
use crate::error::AppResult;

/// Minimum number of suggestions shown before the catalog is used to pad
pub const MIN_SUGGESTIONS: usize = 6;

/// Anything that can supply live recipes for a BMI category
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn fetch_for_bmi_category(&self, category: BmiCategory) -> AppResult<Vec<Recipe>>;
}

#[derive(Clone)]
pub struct MealPlanner {
    source: Arc<dyn RecipeSource>,
}

impl MealPlanner {
    pub fn new(source: Arc<dyn RecipeSource>) -> Self {
        Self { source }
    }

    /// Live recipes for a category, or an empty list if the source fails
    pub async fn live_recipes(&self, category: BmiCategory) -> Vec<Recipe> {
        match self.source.fetch_for_bmi_category(category).await {
            Ok(recipes) => recipes,
            Err(e) => {
                warn!("Live recipe lookup for {} failed: {}", category, e);
                Vec::new()
            }
        }
    }

    /// Suggestions for a category.
    ///
    /// Live results come first, padded with catalog recommendations up to
    /// [`MIN_SUGGESTIONS`]. The filter is applied last; if it removes
    /// everything the unfiltered catalog recommendations are returned.
    pub async fn plan(&self, category: BmiCategory, filter: &RecipeFilter) -> Vec<Recipe> {
        let catalog = get_recipes_for_category(category);
        let mut recipes = self.live_recipes(category).await;

        if recipes.is_empty() {
            info!("No live recipes for {}, using catalog", category);
            recipes = catalog.clone();
        } else if recipes.len() < MIN_SUGGESTIONS {
            for recipe in &catalog {
                if recipes.len() >= MIN_SUGGESTIONS {
                    break;
                }
                if !recipes.iter().any(|r| r.id == recipe.id) {
                    recipes.push(recipe.clone());
                }
            }
        }

        let filtered = filter.apply(recipes);
        if filtered.is_empty() {
            info!("Filter removed every suggestion for {}, using catalog", category);
            return catalog;
        }
        filtered
    }
}
