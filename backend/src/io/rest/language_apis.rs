//! # REST API for the UI Language Preference

use axum::{
    extract::State,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use shared::{LanguageResponse, SetLanguageRequest};
use tracing::{error, info};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_language).put(set_language))
        .route("/toggle", post(toggle_language))
}

pub async fn get_language(State(state): State<AppState>) -> Json<LanguageResponse> {
    info!("GET /api/language");
    Json(LanguageResponse {
        language: state.language_service.current().await,
    })
}

pub async fn set_language(
    State(state): State<AppState>,
    Json(request): Json<SetLanguageRequest>,
) -> impl IntoResponse {
    info!("PUT /api/language - request: {:?}", request);

    match state.language_service.set(request.language).await {
        Ok(language) => Json(LanguageResponse { language }).into_response(),
        Err(e) => {
            error!("Failed to set language: {}", e);
            e.into_response()
        }
    }
}

/// Switch between English and Hindi
pub async fn toggle_language(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/language/toggle");

    match state.language_service.toggle().await {
        Ok(language) => Json(LanguageResponse { language }).into_response(),
        Err(e) => {
            error!("Failed to toggle language: {}", e);
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::api_router;
    use crate::io::rest::test_support::{empty_request, json_request, read_json, test_state};
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use shared::Language;
    use tower::util::ServiceExt; // for `oneshot`

    #[tokio::test]
    async fn test_set_and_toggle_language() {
        let dir = tempfile::tempdir().unwrap();
        let app = api_router().with_state(test_state(dir.path()).await);

        let current: LanguageResponse = read_json(
            app.clone()
                .oneshot(empty_request(Method::GET, "/language"))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(current.language, Language::En);

        let response = app
            .clone()
            .oneshot(json_request(Method::PUT, "/language", json!({"language": "hi"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let toggled: LanguageResponse = read_json(
            app.clone()
                .oneshot(empty_request(Method::POST, "/language/toggle"))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(toggled.language, Language::En);
    }

    #[tokio::test]
    async fn test_unsupported_language_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = api_router().with_state(test_state(dir.path()).await);

        let response = app
            .oneshot(json_request(Method::PUT, "/language", json!({"language": "fr"})))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }
}
