use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trendstitch::config::{Config, LoggingConfig};
use trendstitch::driver::{Driver, FetchPolicy};
use trendstitch::error::ErrorClass;
use trendstitch::report::ConsoleReporter;
use trendstitch::trends::TrendsClient;

#[derive(Parser)]
#[command(
    name = "trendstitch",
    version,
    about = "Poll Google Trends for keywords and stitch overlapping windows into one series",
    long_about = None
)]
struct Cli {
    /// Keywords to track
    #[arg(value_parser = parse_keyword)]
    keywords: Vec<String>,

    /// Minutes between polling ticks
    #[arg(short, long)]
    interval_minutes: Option<u64>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip keywords whose fetch fails instead of exiting
    #[arg(long)]
    keep_going: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long)]
    log_format: Option<String>,
}

fn parse_keyword(s: &str) -> std::result::Result<String, String> {
    if s.trim().is_empty() {
        Err("keyword must not be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(minutes) = cli.interval_minutes {
        config.sampler.interval_minutes = minutes;
    }
    if cli.keep_going {
        config.sampler.keep_going = true;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    config.validate().context("Invalid configuration")?;

    setup_tracing(&config.logging, cli.verbose)?;

    tracing::info!(
        keywords = ?cli.keywords,
        interval_minutes = config.sampler.interval_minutes,
        keep_going = config.sampler.keep_going,
        "trendstitch starting"
    );
    if cli.keywords.is_empty() {
        tracing::warn!("No keywords given, nothing will be fetched");
    }

    let client = TrendsClient::new(&config.provider).context("Failed to create trends client")?;
    let policy = if config.sampler.keep_going {
        FetchPolicy::Skip
    } else {
        FetchPolicy::Abort
    };

    let mut driver = Driver::new(client, ConsoleReporter::stdout(), cli.keywords)
        .with_policy(policy)
        .with_stitch_options(config.stitch);

    if let Err(e) = driver.run(config.interval(), shutdown_signal()).await {
        tracing::error!(category = e.category().description(), error = %e, "Sampling failed");
        return Err(e).context("Sampling stopped");
    }

    tracing::info!(ticks = driver.ticks(), "trendstitch stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!("Failed to wait for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

fn setup_tracing(logging: &LoggingConfig, verbose: bool) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::new(logging.filter_directive(verbose));

    // logs go to stderr so stdout carries only the series listing
    if logging.format == "json" {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}
