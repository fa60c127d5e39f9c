use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::{config::Config, handlers, metrics, service::MovingCostService};

/// Start the estimator server
///
/// This function:
/// 1. Initializes metrics
/// 2. Builds the shared service state
/// 3. Creates the Axum application
/// 4. Binds to the configured address
/// 5. Serves requests with graceful shutdown support
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize metrics
    info!("Initializing Prometheus metrics...");
    let metrics_handle = Arc::new(metrics::init_metrics());

    // Create shared state
    let service = Arc::new(MovingCostService::new(&config)?);
    let app_state = handlers::AppState { service };

    // Build the Axum router
    let app = create_router(app_state, metrics_handle, config.server.max_upload_bytes);

    // Create socket address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting moving cost estimator on {}", addr);
    info!(
        "Configuration: model {}, upload limit {} MiB",
        config.gemini.model,
        config.server.max_upload_bytes / (1024 * 1024)
    );

    // Bind to address
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(
    app_state: handlers::AppState,
    metrics_handle: Arc<metrics_exporter_prometheus::PrometheusHandle>,
    max_upload_bytes: usize,
) -> Router {
    // CORS is wide open so browser frontends can call the API directly
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Estimation endpoints share the service state
    let api_routes = Router::new()
        .route(
            "/api/v1/analyze-video",
            post(handlers::analyze::handle_analyze_video),
        )
        .route(
            "/api/v1/estimate-cost",
            post(handlers::estimate::handle_estimate_cost),
        )
        .with_state(app_state);

    // Combine with public routes
    Router::new()
        .route("/", get(handlers::health::service_info))
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics_handler::metrics))
        .with_state(metrics_handle)
        .merge(api_routes)
        // Video uploads dominate request sizes, so the limit applies app-wide
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received, draining connections...");
}
