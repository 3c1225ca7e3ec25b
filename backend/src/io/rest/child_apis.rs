//! # REST API for Child Management
//!
//! Endpoints for registering, retrieving, updating and deleting children,
//! and for reading their BMI history.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::{error, info};

use crate::AppState;
use shared::{CreateChildRequest, UpdateChildRequest};

/// Create a router for child related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_children).post(create_child))
        .route(
            "/:child_id",
            get(get_child).put(update_child).delete(delete_child),
        )
        .route("/:child_id/bmi-history", get(get_bmi_history))
}

/// Register a new child
pub async fn create_child(
    State(state): State<AppState>,
    Json(request): Json<CreateChildRequest>,
) -> impl IntoResponse {
    info!("POST /api/children - request: {:?}", request);

    match state.child_service.register_child(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to create child: {}", e);
            e.into_response()
        }
    }
}

/// Get a child by ID
pub async fn get_child(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/children/{}", child_id);

    match state.child_service.get_child(&child_id).await {
        Ok(child) => (StatusCode::OK, Json(child)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// List all children
pub async fn list_children(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/children");
    Json(state.child_service.list_children().await)
}

/// Update a child
pub async fn update_child(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
    Json(request): Json<UpdateChildRequest>,
) -> impl IntoResponse {
    info!("PUT /api/children/{} - request: {:?}", child_id, request);

    match state.child_service.update_child(&child_id, request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to update child: {}", e);
            e.into_response()
        }
    }
}

/// Delete a child
pub async fn delete_child(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/children/{}", child_id);

    match state.child_service.delete_child(&child_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete child: {}", e);
            e.into_response()
        }
    }
}

/// BMI measurements for one child, oldest first
pub async fn get_bmi_history(
    State(state): State<AppState>,
    Path(child_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/children/{}/bmi-history", child_id);
    Json(state.child_service.bmi_history(&child_id).await)
}

/// Every BMI record across all children
pub async fn list_bmi_records(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/bmi-records");
    Json(state.child_service.all_bmi_records().await)
}
