use anyhow::Result;
use clap::Args;
use colored::Colorize;
use movecost::{
    config,
    extractor::VideoSource,
    models::{CostEstimate, Inventory, MoveParameters},
    service::MovingCostService,
};
use serde_json::json;
use std::path::{Path, PathBuf};

/// Arguments for the estimate command
#[derive(Args, Debug, Clone)]
pub struct EstimateArgs {
    /// Walkthrough video: a local file path or an http(s) URL
    pub video: String,

    /// Distance between origin and destination in kilometers
    #[arg(long)]
    pub distance_km: f64,

    /// Origin floor number
    #[arg(long, default_value_t = 1)]
    pub origin_floor: u32,

    /// Destination floor number
    #[arg(long, default_value_t = 1)]
    pub destination_floor: u32,

    /// Origin building has an elevator
    #[arg(long)]
    pub elevator_origin: bool,

    /// Destination building has an elevator
    #[arg(long)]
    pub elevator_destination: bool,

    /// Type of home shown in the video
    #[arg(long, default_value = "apartment")]
    pub home_type: String,

    /// Number of rooms shown in the video
    #[arg(long, default_value_t = 3)]
    pub rooms: u32,

    /// Write the full JSON report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the estimate command
///
/// Runs both stages back to back and prints the combined report.
pub async fn execute(args: EstimateArgs, config_path: Option<&Path>) -> Result<()> {
    let cfg = config::load_config_from(config_path)?;
    let service = MovingCostService::new(&cfg)?;
    let source = video_source(&args.video);

    println!("{}", "Stage 1: Analyzing video...".yellow());
    let inventory = service
        .analyze_video(&source, &args.home_type, args.rooms)
        .await?;
    println!("{} Found {} items", "✓".green(), inventory.items.len());
    println!(
        "{} Total volume: {} cubic feet",
        "✓".green(),
        inventory.total_volume_cubic_feet
    );

    println!();
    println!("{}", "Stage 2: Calculating cost...".yellow());
    let params = MoveParameters {
        distance_km: args.distance_km,
        origin_floor: args.origin_floor,
        destination_floor: args.destination_floor,
        has_elevator_origin: args.elevator_origin,
        has_elevator_destination: args.elevator_destination,
    };
    let estimate = service.estimate_cost(&inventory, &params).await?;
    println!("{} Estimated cost: ${}", "✓".green(), estimate.total_cost);

    let report = full_report(&inventory, &estimate);
    println!();
    println!("{}", "=".repeat(50));
    println!("{}", "COMPLETE ESTIMATE".bold());
    println!("{}", "=".repeat(50));
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(path) = &args.output {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        println!();
        println!("{} Report written to {}", "✓".green(), path.display());
    }

    Ok(())
}

/// URLs go to the inference service by reference, everything else is
/// treated as a local file.
fn video_source(video: &str) -> VideoSource {
    if video.starts_with("http") {
        VideoSource::Url(video.to_string())
    } else {
        VideoSource::File(PathBuf::from(video))
    }
}

fn full_report(inventory: &Inventory, estimate: &CostEstimate) -> serde_json::Value {
    json!({
        "inventory": inventory,
        "cost_estimate": estimate,
    })
}
