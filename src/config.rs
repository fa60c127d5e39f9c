use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::estimate::TruckType;

/// Environment variable holding the inference API key, matching the
/// deployment convention for Gemini credentials.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    pub pricing: PricingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Request body cap for video uploads; must sit well above the inline
    /// threshold so the Files API path is reachable.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
            max_upload_bytes: 256 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key; empty here means "take it from GEMINI_API_KEY".
    pub api_key: String,
    pub base_url: String,
    /// Files API root (the upload/v1beta tree, distinct from base_url)
    pub upload_base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
    /// Local videos below this size are inlined into the generation request;
    /// larger ones go through the Files API.
    pub inline_limit_bytes: u64,
    pub poll_interval_seconds: u64,
    /// Upper bound on the file-processing poll loop.
    pub poll_timeout_seconds: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            upload_base_url: "https://generativelanguage.googleapis.com/upload/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            timeout_seconds: 300,
            inline_limit_bytes: 20 * 1024 * 1024,
            poll_interval_seconds: 2,
            poll_timeout_seconds: 600,
        }
    }
}

/// Per-unit pricing table used by the cost calculator.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PricingConfig {
    pub labor_rate_per_hour: f64,
    pub truck_rates: TruckRates,
    pub fuel_cost_per_km: f64,
    pub stairs_fee_per_floor: f64,
    pub packing_material_per_cubic_foot: f64,
    pub base_hours: f64,
    pub hours_per_100_cubic_feet: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            labor_rate_per_hour: 35.0,
            truck_rates: TruckRates::default(),
            fuel_cost_per_km: 0.5,
            stairs_fee_per_floor: 25.0,
            packing_material_per_cubic_foot: 0.20,
            base_hours: 4.0,
            hours_per_100_cubic_feet: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TruckRates {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
}

impl Default for TruckRates {
    fn default() -> Self {
        Self {
            small: 75.0,
            medium: 120.0,
            large: 180.0,
        }
    }
}

impl TruckRates {
    pub fn rate(&self, truck_type: TruckType) -> f64 {
        match truck_type {
            TruckType::Small => self.small,
            TruckType::Medium => self.medium,
            TruckType::Large => self.large,
        }
    }
}

/// Load configuration from `config.{toml,...}` in the working directory
/// (optional) layered with `MOVECOST__`-prefixed environment variables.
pub fn load_config() -> anyhow::Result<Config> {
    load_config_from(None)
}

/// Load configuration from an explicit file path, if given.
pub fn load_config_from(path: Option<&Path>) -> anyhow::Result<Config> {
    let file_source = match path {
        Some(p) => config::File::from(p).required(true),
        None => config::File::with_name("config").required(false),
    };

    let config = config::Config::builder()
        .add_source(file_source)
        .add_source(config::Environment::with_prefix("MOVECOST").separator("__"))
        .build()?;

    let mut cfg: Config = config.try_deserialize()?;

    // The plain GEMINI_API_KEY variable wins over nothing but loses to an
    // explicit config value, so deployments can keep using it unchanged.
    if cfg.gemini.api_key.is_empty() {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            cfg.gemini.api_key = key;
        }
    }

    validate_config(&cfg)?;

    Ok(cfg)
}

fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.gemini.api_key.is_empty() {
        anyhow::bail!(
            "Gemini API key is required: set gemini.api_key or the {} environment variable",
            API_KEY_ENV
        );
    }

    if cfg.gemini.poll_interval_seconds == 0 {
        anyhow::bail!("gemini.poll_interval_seconds must be at least 1");
    }

    if cfg.gemini.poll_timeout_seconds < cfg.gemini.poll_interval_seconds {
        anyhow::bail!("gemini.poll_timeout_seconds must cover at least one poll interval");
    }

    if cfg.server.max_upload_bytes as u64 <= cfg.gemini.inline_limit_bytes {
        anyhow::bail!("server.max_upload_bytes must exceed gemini.inline_limit_bytes");
    }

    let p = &cfg.pricing;
    let rates = [
        ("labor_rate_per_hour", p.labor_rate_per_hour),
        ("truck_rates.small", p.truck_rates.small),
        ("truck_rates.medium", p.truck_rates.medium),
        ("truck_rates.large", p.truck_rates.large),
        ("fuel_cost_per_km", p.fuel_cost_per_km),
        ("stairs_fee_per_floor", p.stairs_fee_per_floor),
        ("packing_material_per_cubic_foot", p.packing_material_per_cubic_foot),
        ("base_hours", p.base_hours),
        ("hours_per_100_cubic_feet", p.hours_per_100_cubic_feet),
    ];
    for (name, value) in rates {
        if !value.is_finite() || value < 0.0 {
            anyhow::bail!("pricing.{} must be a non-negative number, got {}", name, value);
        }
    }

    Ok(())
}
