use anyhow::Result;
use colored::Colorize;
use movecost::{config, server};
use std::path::Path;
use tracing::info;

/// Execute the serve command
///
/// Loads configuration and runs the API server until shutdown.
pub async fn execute(config_path: Option<&Path>) -> Result<()> {
    println!("{}", "Starting moving cost estimator...".green());

    let cfg = config::load_config_from(config_path)?;
    info!(
        host = %cfg.server.host,
        port = cfg.server.port,
        model = %cfg.gemini.model,
        "Configuration loaded"
    );

    // Blocks until shutdown
    server::start_server(cfg).await?;

    Ok(())
}
