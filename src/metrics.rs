use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics exporter
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();

    let handle = builder
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    init_metric_descriptions();

    handle
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!(
        "movecost_requests_total",
        "Total number of API requests by endpoint"
    );
    describe_histogram!(
        "movecost_stage_duration_seconds",
        "Duration of the extraction and estimation stages in seconds"
    );
    describe_counter!(
        "movecost_staffing_fallback_total",
        "Times the volume-rule fallback replaced a model staffing reply"
    );
    describe_counter!(
        "movecost_errors_total",
        "Total number of errors by type"
    );
    describe_gauge!(
        "movecost_info",
        "Service version information"
    );

    gauge!("movecost_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record a handled API request
pub fn record_request(endpoint: &str) {
    counter!(
        "movecost_requests_total",
        "endpoint" => endpoint.to_string(),
    )
    .increment(1);
}

/// Record how long a pipeline stage took
pub fn record_stage_duration(stage: &str, duration: Duration) {
    histogram!(
        "movecost_stage_duration_seconds",
        "stage" => stage.to_string(),
    )
    .record(duration.as_secs_f64());
}

/// Record one activation of the staffing fallback
pub fn record_staffing_fallback() {
    counter!("movecost_staffing_fallback_total").increment(1);
}

/// Record an error
pub fn record_error(error_type: &str) {
    counter!(
        "movecost_errors_total",
        "error_type" => error_type.to_string(),
    )
    .increment(1);
}
