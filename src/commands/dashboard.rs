//! Dashboard command implementation
//!
//! This module implements the `dashboard` subcommand which runs the
//! interactive wizard against a running estimator server.

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde_json::json;
use std::{io, path::Path, sync::Arc, time::Duration};
use tokio::sync::mpsc;

use movecost::{
    config,
    dashboard::{ui::SourceKind, ApiClient, AppAction, DashboardApp},
    models::{CostEstimate, Inventory},
};

const REPORT_FILE: &str = "moving_estimate_report.json";

/// Outcome of a background API call
enum TaskResult {
    Inventory(Result<Inventory, String>),
    Estimate(Result<CostEstimate, String>),
}

/// Execute the dashboard command
///
/// # Arguments
/// * `api_url` - Optional server URL (auto-detected from config if None)
/// * `config_path` - Optional configuration file path
pub async fn execute(api_url: Option<String>, config_path: Option<&Path>) -> Result<()> {
    let api_url = build_api_url(api_url, config_path);
    run_dashboard(api_url).await
}

/// Build the API base URL from the override or the server config
fn build_api_url(url_override: Option<String>, config_path: Option<&Path>) -> String {
    if let Some(url) = url_override {
        return url;
    }

    match config::load_config_from(config_path) {
        Ok(cfg) => format!("http://{}:{}", client_host(&cfg.server.host), cfg.server.port),
        Err(e) => {
            tracing::debug!(error = %e, "config unavailable, using default API URL");
            "http://127.0.0.1:8000".to_string()
        }
    }
}

/// The bind-all address is not a usable client target
fn client_host(host: &str) -> &str {
    if host == "0.0.0.0" {
        "127.0.0.1"
    } else {
        host
    }
}

/// Run the interactive wizard
async fn run_dashboard(api_url: String) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Initialize state
    let mut app = DashboardApp::new();
    let client = Arc::new(ApiClient::new(api_url));
    let (tx, mut rx) = mpsc::unbounded_channel::<TaskResult>();

    // Main loop
    let result = loop {
        if let Err(e) = terminal.draw(|f| app.render(f)) {
            break Err(e.into());
        }

        // Handle events with timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match app.handle_key(key) {
                    AppAction::Quit => break Ok(()),
                    AppAction::AnalyzeVideo => start_analysis(&mut app, &client, &tx),
                    AppAction::EstimateCost => start_estimate(&mut app, &client, &tx),
                    AppAction::SaveReport => save_report(&mut app),
                    AppAction::None => {}
                }
            }
        }

        // Apply finished background calls
        while let Ok(task_result) = rx.try_recv() {
            match task_result {
                TaskResult::Inventory(Ok(inventory)) => app.inventory_ready(inventory),
                TaskResult::Inventory(Err(e)) => app.task_failed(e),
                TaskResult::Estimate(Ok(estimate)) => app.estimate_ready(estimate),
                TaskResult::Estimate(Err(e)) => app.task_failed(e),
            }
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Kick off the Stage 1 call in the background
fn start_analysis(
    app: &mut DashboardApp,
    client: &Arc<ApiClient>,
    tx: &mpsc::UnboundedSender<TaskResult>,
) {
    let input = app.source_input.trim().to_string();
    let home_type = app.home_type();
    let room_count = app.room_count;
    let kind = app.source_kind;

    app.busy = true;
    app.status_message = Some("Analyzing video...".to_string());
    app.error_message = None;

    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = match kind {
            SourceKind::File => {
                client
                    .analyze_video_file(Path::new(&input), home_type, room_count)
                    .await
            }
            SourceKind::Url => client.analyze_video_url(&input, home_type, room_count).await,
        };
        let _ = tx.send(TaskResult::Inventory(result.map_err(|e| e.to_string())));
    });
}

/// Kick off the Stage 2 call in the background
fn start_estimate(
    app: &mut DashboardApp,
    client: &Arc<ApiClient>,
    tx: &mpsc::UnboundedSender<TaskResult>,
) {
    let Some(inventory) = app.inventory.clone() else {
        app.error_message = Some("Analyze a video first".to_string());
        return;
    };
    let params = match app.move_parameters() {
        Ok(params) => params,
        Err(e) => {
            app.error_message = Some(e);
            return;
        }
    };

    app.busy = true;
    app.status_message = Some("Calculating cost estimate...".to_string());
    app.error_message = None;

    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = client.estimate_cost(&inventory, &params).await;
        let _ = tx.send(TaskResult::Estimate(result.map_err(|e| e.to_string())));
    });
}

/// Write the inventory and estimate to a JSON report in the working directory
fn save_report(app: &mut DashboardApp) {
    let (Some(inventory), Some(estimate)) = (&app.inventory, &app.estimate) else {
        app.error_message = Some("Nothing to save yet".to_string());
        return;
    };

    let report = json!({
        "inventory": inventory,
        "cost_estimate": estimate,
    });

    match serde_json::to_string_pretty(&report)
        .map_err(anyhow::Error::from)
        .and_then(|body| std::fs::write(REPORT_FILE, body).map_err(anyhow::Error::from))
    {
        Ok(()) => {
            app.error_message = None;
            app.status_message = Some(format!("Report saved to {}", REPORT_FILE));
        }
        Err(e) => {
            app.error_message = Some(format!("Could not save report: {}", e));
        }
    }
}
