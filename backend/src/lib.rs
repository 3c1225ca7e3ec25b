//! # Nutrition Tracker Backend
//!
//! Non-UI logic for tracking the nutrition of young children at community
//! centers: BMI screening, meal recommendations, meal acceptance logging,
//! reports and CSV exports. A separate relay binary fronts the external
//! recipe API.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, recipe API client, relay)
//!     ↓
//! Domain Layer (BMI rules, services, recommendation filter)
//!     ↓
//! Storage Layer (JSON record collections over a key-value table)
//! ```
//!
//! ## Key Responsibilities
//!
//! - Initialize and configure the application state
//! - Set up the REST API router with CORS and request tracing
//! - Keep domain rules independent of HTTP and of the storage backend

pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{
    AcceptanceService, ChildService, ExportService, LanguageService, MealPlanner, RecipeSource,
    ReportService,
};
use crate::io::recipedb::RecipeDbClient;
use crate::storage::{DbConnection, KeyValueStorage, RecordStore};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub child_service: ChildService,
    pub acceptance_service: AcceptanceService,
    pub report_service: ReportService,
    pub language_service: LanguageService,
    pub export_service: ExportService,
    pub meal_planner: MealPlanner,
}

impl AppState {
    /// Wire every service to one storage backend and one live recipe source
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        recipe_source: Arc<dyn RecipeSource>,
        export_dir: impl Into<PathBuf>,
    ) -> Self {
        let store = RecordStore::new(storage.clone());

        Self {
            child_service: ChildService::new(store.clone()),
            acceptance_service: AcceptanceService::new(store.clone()),
            report_service: ReportService::new(store.clone()),
            language_service: LanguageService::new(storage),
            export_service: ExportService::new(store, export_dir),
            meal_planner: MealPlanner::new(recipe_source),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::init(config)
        .await
        .context("failed to open database")?;

    info!("Using recipe API at {}", config.recipe_proxy_url);
    let recipe_client =
        RecipeDbClient::new(&config.recipe_proxy_url).context("failed to create recipe client")?;

    info!("Setting up application state");
    Ok(AppState::new(
        Arc::new(db),
        Arc::new(recipe_client),
        config.export_dir.clone(),
    ))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Result<Router> {
    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("invalid CORS origin '{}'", config.cors_origin))?;

    // CORS setup to allow frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Ok(Router::new()
        .nest("/api", io::rest::api_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}
