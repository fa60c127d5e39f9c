use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

/// Health check endpoint
/// Returns 200 OK if the service is running
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "service": "moving-cost-estimator",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

/// Root endpoint describing the API surface
pub async fn service_info() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "message": "Moving Cost Estimator API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /api/v1/analyze-video": "Analyze video and get inventory",
            "POST /api/v1/estimate-cost": "Calculate moving cost from inventory"
        }
    })))
}
