use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use movecost::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = cli::Cli::parse();

    // Initialize tracing/logging early
    init_tracing();

    // Dispatch to appropriate command handler
    match args.get_command() {
        cli::Commands::Serve => {
            commands::serve::execute(args.config.as_deref()).await?;
        }
        cli::Commands::Estimate(estimate_args) => {
            commands::estimate::execute(estimate_args, args.config.as_deref()).await?;
        }
        cli::Commands::Dashboard { api_url } => {
            commands::dashboard::execute(api_url, args.config.as_deref()).await?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(args.config.as_deref())?,
            cli::ConfigCommands::Validate => commands::config::validate(args.config.as_deref())?,
        },
    }

    Ok(())
}
