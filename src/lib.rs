pub mod config;
pub mod dashboard;
pub mod error;
pub mod estimator;
pub mod extractor;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod parser;
pub mod pricing;
pub mod prompts;
pub mod providers;
pub mod server;
pub mod service;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing/logging
///
/// Note: This function can only be called once per process.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}
