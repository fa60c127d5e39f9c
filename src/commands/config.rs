use anyhow::Result;
use colored::Colorize;
use movecost::config::{self, Config};
use std::path::Path;
use tracing::info;

/// Execute the config show command
///
/// Displays the current configuration with secrets masked
pub fn show(config_path: Option<&Path>) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!("Loading configuration for display");

    let cfg = config::load_config_from(config_path)?;
    let sanitized = sanitize_secrets(&cfg);

    println!("{}", "Current Configuration:".green().bold());
    println!();

    // Serialize to TOML format
    let toml_string = toml::to_string_pretty(&sanitized)?;
    println!("{}", toml_string);

    info!("Configuration displayed successfully");
    Ok(())
}

/// Execute the config validate command
///
/// Validates the configuration file
pub fn validate(config_path: Option<&Path>) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());
    info!("Validating configuration file");

    let cfg = config::load_config_from(config_path)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  Server: {}:{}", cfg.server.host, cfg.server.port);
    println!("  Model: {}", cfg.gemini.model);
    println!(
        "  Upload limit: {} MiB (inline below {} MiB)",
        cfg.server.max_upload_bytes / (1024 * 1024),
        cfg.gemini.inline_limit_bytes / (1024 * 1024)
    );
    println!(
        "  Labor rate: ${}/h, truck rates: ${}/${}/${}",
        cfg.pricing.labor_rate_per_hour,
        cfg.pricing.truck_rates.small,
        cfg.pricing.truck_rates.medium,
        cfg.pricing.truck_rates.large
    );

    info!("Configuration validation successful");
    Ok(())
}

/// Sanitize secrets in configuration for safe display
fn sanitize_secrets(cfg: &Config) -> Config {
    let mut sanitized = cfg.clone();
    sanitized.gemini.api_key = mask_api_key(&sanitized.gemini.api_key);
    sanitized
}

/// Mask an API key for safe display
///
/// Shows first 7 and last 4 characters with asterisks in between
fn mask_api_key(key: &str) -> String {
    if key.len() <= 11 {
        // Too short to mask meaningfully
        return "***".to_string();
    }

    let prefix = &key[..7];
    let suffix = &key[key.len() - 4..];

    format!("{}...{}", prefix, suffix)
}
