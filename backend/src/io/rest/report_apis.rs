//! # REST API for Reports

use axum::{extract::State, response::Json, routing::get, Router};
use shared::ReportSummary;
use tracing::info;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/summary", get(get_summary))
}

/// Aggregated figures for the reports page, with the trend ending today (UTC)
pub async fn get_summary(State(state): State<AppState>) -> Json<ReportSummary> {
    info!("GET /api/reports/summary");
    Json(state.report_service.summary_now().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::api_router;
    use crate::io::rest::test_support::{empty_request, read_json, test_state};
    use axum::http::{Method, StatusCode};
    use tower::util::ServiceExt; // for `oneshot`

    #[tokio::test]
    async fn test_empty_summary() {
        let dir = tempfile::tempdir().unwrap();
        let app = api_router().with_state(test_state(dir.path()).await);

        let response = app
            .oneshot(empty_request(Method::GET, "/reports/summary"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let summary: ReportSummary = read_json(response).await;
        assert_eq!(summary.total_children, 0);
        assert_eq!(summary.category_distribution.len(), 4);
        assert_eq!(summary.weekly_trend.len(), 7);
        assert!(summary.top_meals.is_empty());
    }
}
