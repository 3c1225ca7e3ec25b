//! Error kinds shared by the domain, storage and IO layers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid measurement: {0}")]
    InvalidMeasurement(String),

    #[error("Invalid request: {0}")]
    InvalidInput(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Storage full: {attempted} bytes would exceed the {quota} byte quota")]
    StorageFull { attempted: usize, quota: usize },

    #[error("Upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    #[error("Upstream returned status {status}")]
    UpstreamError { status: u16, body: String },

    #[error("Export row {row} does not match the header: missing {missing:?}, extra {extra:?}")]
    ExportShapeMismatch {
        row: usize,
        missing: Vec<String>,
        extra: Vec<String>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::StorageUnavailable(err.to_string())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidMeasurement(_)
            | AppError::InvalidInput(_)
            | AppError::ExportShapeMismatch { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::StorageFull { .. } => StatusCode::INSUFFICIENT_STORAGE,
            AppError::UpstreamUnreachable(_) | AppError::UpstreamError { .. } => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
