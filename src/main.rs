//! Monsoon CLI
//!
//! Command-line entry point for the live telemetry core:
//! - Watch the live feed and log derived view models
//! - Inspect the configured region markers
//! - Generate a default config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use monsoon::config::Config;
use monsoon::feed::{FeedClient, FeedEvent, Topic, WsTransport};
use monsoon::model::{Parameter, Snapshot};
use monsoon::regions::{default_regions, load_regions};
use monsoon::view::{forecast_chart, sensor_card};

#[derive(Parser)]
#[command(name = "monsoon")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live weather telemetry core")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path (default: standard locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Subscribe to the live feed and log derived view models
    Watch {
        /// Feed URL override
        #[arg(long)]
        url: Option<String>,
    },

    /// List the configured region markers
    Regions,

    /// Print a default config file to stdout
    InitConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {:?}", path))?,
        None => Config::load_default(),
    };

    init_tracing(&config);

    match cli.command.unwrap_or(Commands::Watch { url: None }) {
        Commands::Watch { url } => {
            let mut config = config;
            if let Some(url) = url {
                config.feed.url = url;
            }
            watch(config).await
        }
        Commands::Regions => list_regions(&config),
        Commands::InitConfig => {
            print!("{}", monsoon::config::generate_default_config());
            Ok(())
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("monsoon={}", config.logging.level)));

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Subscribe to both topics and log derived view models until ctrl-c
async fn watch(config: Config) -> anyhow::Result<()> {
    tracing::info!("Monsoon v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(url = %config.feed.url, "Connecting to live feed");

    let client = FeedClient::spawn(config.feed, Box::new(WsTransport::new()));

    let sensors = client.subscribe(Topic::Sensors, |event| match event {
        FeedEvent::Snapshot(Snapshot::Sensors(snapshot)) => {
            for parameter in Parameter::all() {
                if let Some(reading) = snapshot.reading(*parameter) {
                    let card = sensor_card(reading);
                    tracing::info!(
                        title = card.title,
                        value = card.value,
                        unit = %card.unit,
                        trend = card.trend.glyph(),
                        updated = %card.updated_at,
                        "Sensor update"
                    );
                }
            }
        }
        FeedEvent::ConnectionLost { reason } => {
            tracing::warn!(reason = %reason, "Sensor feed lost");
        }
        FeedEvent::Restored => tracing::info!("Sensor feed restored"),
        FeedEvent::Snapshot(_) => {}
    })?;

    let predictions = client.subscribe(Topic::Predictions, |event| {
        if let FeedEvent::Snapshot(Snapshot::Predictions(snapshot)) = event {
            for parameter in Parameter::all() {
                if let Some(series) = snapshot.series_for(*parameter) {
                    let chart = forecast_chart(*parameter, series);
                    let span = match (chart.points.first(), chart.points.last()) {
                        (Some(first), Some(last)) => format!("{} - {}", first.label, last.label),
                        _ => "empty".to_string(),
                    };
                    tracing::info!(
                        title = chart.title,
                        points = chart.points.len(),
                        span = %span,
                        "Forecast update"
                    );
                }
            }
        }
    })?;

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;

    tracing::info!("Shutting down...");
    sensors.cancel();
    predictions.cancel();
    client.close().await;
    Ok(())
}

fn list_regions(config: &Config) -> anyhow::Result<()> {
    let regions = match &config.regions.file {
        Some(path) => {
            load_regions(path).with_context(|| format!("loading regions from {:?}", path))?
        }
        None => default_regions(),
    };

    for region in regions {
        println!(
            "{:12} ({:8.4}, {:8.4})  {:14} rain {:5.1} mm  humidity {:3.0}%  marker {}",
            region.name,
            region.coordinates.0,
            region.coordinates.1,
            region.condition,
            region.rainfall,
            region.humidity,
            region.marker_color().hex(),
        );
    }
    Ok(())
}
