//! # Monsoon
//!
//! Live weather telemetry core: the real-time data layer behind a
//! weather-monitoring dashboard. Subscribes to an upstream feed, validates
//! and types every snapshot at the boundary, and derives display-ready
//! view models. Rendering is left to a display layer.
//!
//! ## Modules
//!
//! - [`model`]: typed domain data and validated snapshot decoding
//! - [`feed`]: the live feed client (subscribe by topic, snapshot callbacks,
//!   reconnect with backoff)
//! - [`view`]: pure view-model derivation (labels, colors, trend tokens)
//! - [`regions`]: region markers for the map overview
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use monsoon::config::FeedConfig;
//! use monsoon::feed::{FeedClient, FeedEvent, Topic, WsTransport};
//! use monsoon::model::{Parameter, Snapshot};
//! use monsoon::view::sensor_card;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FeedClient::spawn(FeedConfig::default(), Box::new(WsTransport::new()));
//!
//!     let subscription = client.subscribe(Topic::Sensors, |event| {
//!         if let FeedEvent::Snapshot(Snapshot::Sensors(snapshot)) = event {
//!             if let Some(reading) = snapshot.reading(Parameter::Rainfall) {
//!                 let card = sensor_card(reading);
//!                 println!("{}: {} {}", card.title, card.value, card.unit);
//!             }
//!         }
//!     })?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     subscription.cancel();
//!     client.close().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod feed;
pub mod model;
pub mod regions;
pub mod view;

// Re-export top-level types for convenience
pub use model::{
    DecodeError, DecodeResult, ForecastPoint, ForecastSeries, ForecastSnapshot, Parameter,
    SensorReading, SensorSnapshot, Snapshot, Trend,
};

pub use feed::{
    FeedClient, FeedError, FeedEvent, FeedResult, FeedStatus, Subscription, Topic, WsTransport,
};

pub use view::{
    color_for_rainfall, forecast_chart, format_timestamp, label_for, sensor_card,
    trend_indicator, ForecastChartView, RainfallColor, SensorCardView, TrendIndicator,
};

pub use regions::{default_regions, load_regions, RegionMarker, RegionsError};

pub use config::{Config, ConfigError, FeedConfig, LoggingConfig, RegionsConfig};
