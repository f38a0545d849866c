// In app/src/main.rs

use anyhow::{Context, Result};
use app_config::Settings;
use clap::{Parser, Subcommand};
use engine::Engine;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::prelude::*;

mod output;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "Solana wallet trading analytics.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serves the dashboard API.
    Serve,

    /// Analyzes a wallet's on-chain activity and prints its metrics.
    Analyze {
        /// The base58 wallet address.
        address: String,

        /// Also ask the configured language model for insights.
        #[arg(long)]
        insights: bool,
    },

    /// Queues the per-token trade query for a wallet.
    QueueTrades {
        /// The base58 wallet address.
        address: String,
    },

    /// Fetches a queued trade query and prints the trade view once it is ready.
    PollTrades {
        /// The execution id returned by `queue-trades`.
        execution_id: String,

        /// Keep polling until the execution finishes.
        #[arg(long)]
        wait: bool,

        /// Seconds between polls when waiting.
        #[arg(long, default_value_t = 5)]
        interval: u64,
    },
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let settings = app_config::load_settings().context("Failed to load configuration")?;
    init_tracing(&settings);

    tracing::info!(environment = %settings.app.environment, "Starting wallet-insights");

    // Match on the parsed command and call the appropriate handler.
    match cli.command {
        Commands::Serve => serve(settings).await?,
        Commands::Analyze { address, insights } => handle_analyze(&settings, &address, insights).await?,
        Commands::QueueTrades { address } => handle_queue(&settings, &address).await?,
        Commands::PollTrades { execution_id, wait, interval } => {
            handle_poll(&settings, &execution_id, wait, Duration::from_secs(interval)).await?
        }
    }

    Ok(())
}

fn init_tracing(settings: &Settings) {
    let level = tracing::Level::from_str(&settings.app.log_level).unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(
        tracing_subscriber::filter::Targets::new()
            .with_target("hyper", tracing::Level::WARN)
            .with_target("hyper_util", tracing::Level::WARN)
            .with_target("reqwest", tracing::Level::WARN)
            .with_default(level),
    );
    tracing_subscriber::registry().with(fmt_layer).init();
}

// --- "Serve" Subcommand Logic ---

/// Builds the engine against live clients and serves the API until terminated.
async fn serve(settings: Settings) -> Result<()> {
    let engine = Engine::from_settings(&settings)?;
    let state = web_server::AppState::new(engine);

    web_server::run(&settings.server, state).await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

// --- One-shot Subcommands ---

async fn handle_analyze(settings: &Settings, address: &str, with_insights: bool) -> Result<()> {
    let engine = Engine::from_settings(settings)?;
    let mut metrics = engine.wallet.analyze(address).await?;

    if with_insights {
        let snapshot = serde_json::to_value(&metrics)?;
        metrics.ai_insights = engine.insights.generate("", &snapshot).await?;
    }

    output::print_wallet_summary(address, &metrics);
    output::print_json(&metrics)
}

async fn handle_queue(settings: &Settings, address: &str) -> Result<()> {
    let engine = Engine::from_settings(settings)?;
    let execution = engine.trades.queue(address).await?;

    println!("Queued execution {} ({})", execution.execution_id, execution.state);
    println!("Poll with: wallet-insights poll-trades {} --wait", execution.execution_id);
    Ok(())
}

async fn handle_poll(settings: &Settings, execution_id: &str, wait: bool, interval: Duration) -> Result<()> {
    let engine = Engine::from_settings(settings)?;

    loop {
        let report = engine.trades.poll(execution_id).await?;
        if report.status.is_execution_finished || !wait {
            if let Some(analysis) = &report.analysis {
                output::print_trade_summary(analysis);
            }
            return output::print_json(&report);
        }
        tracing::info!(execution_id, state = %report.status.state, "Execution still running...");
        tokio::time::sleep(interval).await;
    }
}
