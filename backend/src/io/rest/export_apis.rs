//! # REST API for Data Export
//!
//! CSV downloads of the stored collections, and exports written into the
//! server's export directory.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use shared::ExportToPathRequest;
use tracing::{error, info};

use crate::error::AppError;
use crate::storage::Collection;
use crate::AppState;

/// Create a router for export related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:collection", get(download_csv))
        .route("/:collection/to-path", post(export_to_path))
}

fn collection_from_path(slug: &str) -> Result<Collection, AppError> {
    Collection::from_slug(slug).ok_or_else(|| AppError::NotFound(format!("Collection {}", slug)))
}

/// Download a collection as CSV. An empty collection yields 204 and no file.
pub async fn download_csv(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Response {
    info!("GET /api/export/{}", collection);

    let collection = match collection_from_path(&collection) {
        Ok(collection) => collection,
        Err(e) => return e.into_response(),
    };

    match state.export_service.export_collection(collection).await {
        Ok(Some(export)) => {
            info!(
                "Exporting {} records as {}",
                export.record_count, export.filename
            );
            let disposition = format!("attachment; filename=\"{}\"", export.filename);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, export.mime_type().to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                export.content,
            )
                .into_response()
        }
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to export {:?}: {}", collection, e);
            e.into_response()
        }
    }
}

/// Write a collection into the export directory
pub async fn export_to_path(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(request): Json<ExportToPathRequest>,
) -> Response {
    info!("POST /api/export/{}/to-path - request: {:?}", collection, request);

    let collection = match collection_from_path(&collection) {
        Ok(collection) => collection,
        Err(e) => return e.into_response(),
    };

    match state
        .export_service
        .export_collection_to(collection, request)
        .await
    {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to export {:?} to path: {}", collection, e);
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::api_router;
    use crate::io::rest::test_support::{empty_request, json_request, read_json, test_state};
    use axum::http::Method;
    use serde_json::json;
    use shared::ExportToPathResponse;
    use tower::util::ServiceExt; // for `oneshot`

    async fn setup_test_app() -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let app = api_router().with_state(test_state(dir.path()).await);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/children",
                json!({"name": "Asha", "age": 4, "gender": "female", "heightCm": 100.0, "weightKg": 16.0}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        (app, dir)
    }

    #[tokio::test]
    async fn test_download_children_csv() {
        let (app, _dir) = setup_test_app().await;

        let response = app
            .oneshot(empty_request(Method::GET, "/export/children"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"children_data.csv\""
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("\"id\",\"name\",\"age\""));
        assert!(lines[1].contains("\"Asha\""));
    }

    #[tokio::test]
    async fn test_empty_collection_has_no_content() {
        let (app, _dir) = setup_test_app().await;

        let response = app
            .oneshot(empty_request(Method::GET, "/export/acceptance-logs"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_unknown_collection_is_not_found() {
        let (app, _dir) = setup_test_app().await;

        let response = app
            .oneshot(empty_request(Method::GET, "/export/passwords"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_to_path_writes_file() {
        let (app, dir) = setup_test_app().await;

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/export/bmi-records/to-path",
                json!({"filename": null}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let result: ExportToPathResponse = read_json(response).await;
        assert!(result.success);
        assert_eq!(result.record_count, 1);
        assert!(dir.path().join("bmi_records.csv").exists());
    }
}
