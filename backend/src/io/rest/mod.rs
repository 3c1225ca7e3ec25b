//! # REST API Interface Layer
//!
//! HTTP endpoints served under `/api`. Each submodule owns the routes for
//! one resource and exposes a `router()` that is nested here.
//!
//! Errors leave the handlers as [`crate::error::AppError`], which renders a
//! `{"error": "..."}` body with the matching status code.
//!
//! ## Endpoints
//!
//! - `/children`, `/children/:id`, `/children/:id/bmi-history`, `/bmi-records`
//! - `/acceptance-logs`
//! - `/recipes/recommendations`, `/recipes/live`
//! - `/reports/summary`
//! - `/language`, `/language/toggle`
//! - `/export/:collection`, `/export/:collection/to-path`

pub mod acceptance_apis;
pub mod child_apis;
pub mod export_apis;
pub mod language_apis;
pub mod recipe_apis;
pub mod report_apis;

use axum::{routing::get, Router};

use crate::AppState;

/// All API routes, to be nested under `/api`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/children", child_apis::router())
        .route("/bmi-records", get(child_apis::list_bmi_records))
        .nest("/acceptance-logs", acceptance_apis::router())
        .nest("/recipes", recipe_apis::router())
        .nest("/reports", report_apis::router())
        .nest("/language", language_apis::router())
        .nest("/export", export_apis::router())
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use axum::response::Response;
    use serde::de::DeserializeOwned;
    use shared::{BmiCategory, Recipe};
    use std::path::Path;
    use std::sync::Arc;

    use crate::domain::RecipeSource;
    use crate::error::{AppError, AppResult};
    use crate::storage::DbConnection;
    use crate::AppState;

    /// Live recipe source that is always down
    pub struct OfflineSource;

    #[async_trait]
    impl RecipeSource for OfflineSource {
        async fn fetch_for_bmi_category(&self, _category: BmiCategory) -> AppResult<Vec<Recipe>> {
            Err(AppError::UpstreamUnreachable("offline".to_string()))
        }
    }

    pub async fn test_state(export_dir: &Path) -> AppState {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        AppState::new(Arc::new(db), Arc::new(OfflineSource), export_dir)
    }

    pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    pub async fn read_json<T: DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }
}
