use axum::{extract::State, http::header, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Handle /metrics endpoint
///
/// Renders the Prometheus exposition text for everything recorded through
/// [`crate::metrics`].
pub async fn metrics(State(handle): State<Arc<PrometheusHandle>>) -> impl IntoResponse {
    let body = handle.render();
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}
