//! # REST API for Meal Acceptance
//!
//! Endpoints for logging how much of a meal a child ate and listing the logs.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::AppState;
use shared::LogMealRequest;

/// Query parameters for the acceptance log list endpoint
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AcceptanceLogQuery {
    pub child_id: Option<String>,
}

/// Create a router for acceptance related APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_logs).post(log_meal))
}

/// Log a meal observation
pub async fn log_meal(
    State(state): State<AppState>,
    Json(request): Json<LogMealRequest>,
) -> impl IntoResponse {
    info!("POST /api/acceptance-logs - request: {:?}", request);

    match state.acceptance_service.log_meal(request).await {
        Ok(log) => (StatusCode::CREATED, Json(log)).into_response(),
        Err(e) => {
            error!("Failed to log meal: {}", e);
            e.into_response()
        }
    }
}

/// List acceptance logs, optionally for one child
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<AcceptanceLogQuery>,
) -> impl IntoResponse {
    info!("GET /api/acceptance-logs - query: {:?}", query);

    let response = match query.child_id {
        Some(child_id) => state.acceptance_service.logs_for_child(&child_id).await,
        None => state.acceptance_service.list_logs().await,
    };
    Json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::api_router;
    use crate::io::rest::test_support::{empty_request, json_request, read_json, test_state};
    use axum::http::Method;
    use serde_json::json;
    use shared::{AcceptanceLog, AcceptanceLogListResponse, AcceptanceStatus, ChildResponse};
    use tower::util::ServiceExt; // for `oneshot`

    #[tokio::test]
    async fn test_log_and_list_meals() {
        let dir = tempfile::tempdir().unwrap();
        let app = api_router().with_state(test_state(dir.path()).await);

        let child: ChildResponse = read_json(
            app.clone()
                .oneshot(json_request(
                    Method::POST,
                    "/children",
                    json!({"name": "Asha", "age": 4, "gender": "female", "heightCm": 100.0, "weightKg": 16.0}),
                ))
                .await
                .unwrap(),
        )
        .await;
        let child_id = child.child.id;

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/acceptance-logs",
                json!({
                    "childId": child_id,
                    "recipeId": "1",
                    "recipeName": null,
                    "status": "partially_eaten",
                    "mealType": "lunch"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let log: AcceptanceLog = read_json(response).await;
        assert_eq!(log.status, AcceptanceStatus::PartiallyEaten);

        let uri = format!("/acceptance-logs?childId={}", child_id);
        let list: AcceptanceLogListResponse = read_json(
            app.clone()
                .oneshot(empty_request(Method::GET, &uri))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(list.logs, vec![log]);

        let other: AcceptanceLogListResponse = read_json(
            app.oneshot(empty_request(Method::GET, "/acceptance-logs?childId=nobody"))
                .await
                .unwrap(),
        )
        .await;
        assert!(other.logs.is_empty());
    }

    #[tokio::test]
    async fn test_log_for_unknown_child_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = api_router().with_state(test_state(dir.path()).await);

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/acceptance-logs",
                json!({
                    "childId": "c1",
                    "recipeId": "live-99",
                    "recipeName": null,
                    "status": "fully_eaten",
                    "mealType": "snack"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
