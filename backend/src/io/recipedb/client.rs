use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use shared::{BmiCategory, Recipe};
use std::time::Duration;
use tracing::{debug, error, info};

use super::normalizer::normalize_response;
use crate::domain::meal_planner::RecipeSource;
use crate::error::{AppError, AppResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const API_PREFIX: &str = "recipe2-api";

/// Region and range filters for the cuisine endpoint. Empty values are sent as empty parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CuisineQuery {
    pub region: String,
    pub continent: String,
    pub sub_region: String,
    pub field: String,
    pub min: String,
    pub max: String,
    pub page: u32,
    pub page_size: u32,
}

/// Typed client for the recipe API, normally pointed at the local relay
#[derive(Clone)]
pub struct RecipeDbClient {
    client: Client,
    base_url: Url,
}

impl RecipeDbClient {
    pub fn new(base_url: &str) -> AppResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            AppError::InvalidInput(format!("Invalid recipe API URL '{}': {}", base_url, e))
        })?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::InvalidInput(format!("Recipe API URL {} cannot have a path", self.base_url)))?
            .pop_if_empty()
            .push(API_PREFIX)
            .extend(segments);
        Ok(url)
    }

    async fn fetch(&self, segments: &[&str], query: &[(&str, String)]) -> AppResult<Vec<Recipe>> {
        let url = self.endpoint(segments)?;
        debug!("Fetching recipes from {} with {:?}", url, query);

        let response = self
            .client
            .get(url.clone())
            .query(query)
            .send()
            .await
            .map_err(|e| {
                error!("Recipe API request to {} failed: {}", url, e);
                AppError::UpstreamUnreachable(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Recipe API returned {} for {}: {}", status, url, body);
            return Err(AppError::UpstreamError {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await.map_err(|e| AppError::UpstreamError {
            status: status.as_u16(),
            body: format!("Invalid JSON from recipe API: {}", e),
        })?;

        let recipes = normalize_response(body);
        info!("Recipe API returned {} recipes from {}", recipes.len(), url);
        Ok(recipes)
    }

    pub async fn nutrition_info(&self, page: u32, limit: u32) -> AppResult<Vec<Recipe>> {
        self.fetch(
            &["recipe-nutri", "nutritioninfo"],
            &[("page", page.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    pub async fn recipes_info(&self, page: u32, limit: u32) -> AppResult<Vec<Recipe>> {
        self.fetch(
            &["recipe", "recipesinfo"],
            &[("page", page.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    pub async fn search_recipe(&self, recipe_id: &str) -> AppResult<Vec<Recipe>> {
        self.fetch(&["search-recipe", recipe_id], &[]).await
    }

    /// First match for a recipe id, if any
    pub async fn recipe_info(&self, recipe_id: &str) -> AppResult<Option<Recipe>> {
        Ok(self.search_recipe(recipe_id).await?.into_iter().next())
    }

    pub async fn search_by_ingredient(&self, ingredient: &str) -> AppResult<Vec<Recipe>> {
        self.fetch(
            &["recipes-by-ingredients"],
            &[("ingredient", ingredient.to_string())],
        )
        .await
    }

    pub async fn recipes_by_calories(
        &self,
        min_calories: u32,
        max_calories: u32,
        limit: u32,
    ) -> AppResult<Vec<Recipe>> {
        self.fetch(
            &["recipes-calories", "calories"],
            &[
                ("minCalories", min_calories.to_string()),
                ("maxCalories", max_calories.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    pub async fn protein_range(
        &self,
        min: u32,
        max: u32,
        page: u32,
        limit: u32,
    ) -> AppResult<Vec<Recipe>> {
        self.fetch(
            &["protein", "protein-range"],
            &[
                ("min", min.to_string()),
                ("max", max.to_string()),
                ("page", page.to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    pub async fn recipes_by_cuisine(&self, query: &CuisineQuery) -> AppResult<Vec<Recipe>> {
        self.fetch(
            &["recipes_cuisine", "cuisine", query.region.as_str()],
            &[
                ("continent", query.continent.clone()),
                ("subRegion", query.sub_region.clone()),
                ("field", query.field.clone()),
                ("min", query.min.clone()),
                ("max", query.max.clone()),
                ("page", query.page.max(1).to_string()),
                ("page_size", query.page_size.max(1).to_string()),
            ],
        )
        .await
    }

    pub async fn instructions(&self, recipe_id: &str) -> AppResult<Vec<Recipe>> {
        self.fetch(&["instructions", recipe_id], &[]).await
    }
}

#[async_trait]
impl RecipeSource for RecipeDbClient {
    /// Every category currently reads the first page of nutrition info;
    /// the planner does the per-category filtering.
    async fn fetch_for_bmi_category(&self, category: BmiCategory) -> AppResult<Vec<Recipe>> {
        debug!("Fetching live recipes for {}", category);
        self.nutrition_info(1, 10).await
    }
}
