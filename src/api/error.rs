use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use crate::sources::SourceError;

#[derive(Serialize)]
struct ErrorBody {
    status: String,
    reason: String,
    details: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Upstream(#[from] SourceError),

    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("API error: {}", self);

        let (status_code, reason) = match &self {
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
            ApiError::Encode(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = ErrorBody {
            status: "failed".to_string(),
            reason: reason.to_string(),
            details: self.to_string(),
        };

        (status_code, Json(body)).into_response()
    }
}
