use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error (bad config file, unknown truck tier)
    #[error("Configuration error: {0}")]
    Config(String),
    /// Stage 1 failure: video read/upload or inference call
    #[error("Extraction failed: {0}")]
    Extraction(String),
    /// Model output is not valid JSON after fence stripping
    #[error("Parse error: {0}")]
    Parse(String),
    /// Model output parsed as JSON but does not match the expected schema
    #[error("Schema error: {0}")]
    Schema(String),
    /// Malformed estimator input (non-positive distance, zero floor)
    #[error("Cost estimation error: {0}")]
    CostEstimation(String),
    /// Missing or invalid request input at the HTTP boundary
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Upstream inference API returned a non-success status
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: StatusCode, message: String },
    /// HTTP transport error (preserves reqwest::Error for inspection)
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        crate::metrics::record_error(self.type_name());

        // Only a missing required input maps to 400; every internal failure,
        // upstream errors included, surfaces as 500 with a descriptive message.
        let status = match &self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "type": error_type_name(&self),
            }
        }));

        (status, body).into_response()
    }
}

fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::Config(_) => "config_error",
        AppError::Extraction(_) => "extraction_error",
        AppError::Parse(_) => "parse_error",
        AppError::Schema(_) => "schema_error",
        AppError::CostEstimation(_) => "cost_estimation_error",
        AppError::InvalidRequest(_) => "invalid_request",
        AppError::Upstream { .. } => "upstream_error",
        AppError::Http(_) => "http_request_error",
    }
}

impl AppError {
    /// Stable label for metrics and logs
    pub fn type_name(&self) -> &'static str {
        error_type_name(self)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Config(err.to_string())
    }
}
