//! Core data types for the Monsoon telemetry layer
//!
//! This module defines the fundamental types flowing from the live feed to
//! the view layer:
//! - `Parameter` and `Trend`: closed classification enums
//! - `SensorReading`: the latest measurement for one parameter
//! - `ForecastPoint` / `ForecastSeries`: hourly prediction data
//! - `SensorSnapshot` / `ForecastSnapshot` / `Snapshot`: full topic payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use super::error::DecodeError;

/// The measured weather parameter
///
/// This is a closed set: every lookup keyed by parameter is an exhaustive
/// match, so adding a fifth kind is a compile-visible change at each site.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    /// Rainfall in millimetres
    Rainfall,
    /// Soil moisture percentage
    Moisture,
    /// Relative air humidity percentage
    Humidity,
    /// Atmospheric pressure in hPa
    Pressure,
}

impl Parameter {
    /// Get all parameters for iteration, in display order
    pub fn all() -> &'static [Parameter] {
        &[
            Parameter::Rainfall,
            Parameter::Moisture,
            Parameter::Humidity,
            Parameter::Pressure,
        ]
    }

    /// Wire name of this parameter (the key used in snapshot payloads)
    pub fn as_str(&self) -> &'static str {
        match self {
            Parameter::Rainfall => "rainfall",
            Parameter::Moisture => "moisture",
            Parameter::Humidity => "humidity",
            Parameter::Pressure => "pressure",
        }
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Parameter {
    type Err = DecodeError;

    /// Parse a wire name into a parameter
    ///
    /// Anything outside the closed set fails loudly; silently defaulting
    /// here would misrender a sensor type to the viewer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rainfall" => Ok(Parameter::Rainfall),
            "moisture" => Ok(Parameter::Moisture),
            "humidity" => Ok(Parameter::Humidity),
            "pressure" => Ok(Parameter::Pressure),
            other => Err(DecodeError::UnknownParameter(other.to_string())),
        }
    }
}

/// Direction a sensor value is moving relative to its previous reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    /// Wire name of this trend
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trend {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Trend::Up),
            "down" => Ok(Trend::Down),
            "stable" => Ok(Trend::Stable),
            other => Err(DecodeError::MalformedSnapshot(format!(
                "unknown trend {:?} (expected up, down or stable)",
                other
            ))),
        }
    }
}

/// The latest measurement for one parameter
///
/// An immutable snapshot: each feed update replaces the whole reading,
/// nothing is mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorReading {
    /// Which parameter this reading measures
    pub parameter: Parameter,
    /// The measured value
    pub value: f64,
    /// Unit of measurement (e.g. "mm", "%", "hPa")
    pub unit: String,
    /// Direction relative to the previous reading
    pub trend: Trend,
    /// When the sensor observed this value
    pub observed_at: DateTime<Utc>,
}

impl SensorReading {
    /// Create a reading observed now
    pub fn new(parameter: Parameter, value: f64, unit: impl Into<String>, trend: Trend) -> Self {
        Self {
            parameter,
            value,
            unit: unit.into(),
            trend,
            observed_at: Utc::now(),
        }
    }

    /// Builder method: set the observation time
    pub fn observed_at(mut self, at: DateTime<Utc>) -> Self {
        self.observed_at = at;
        self
    }
}

/// One predicted value at a point in time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ForecastPoint {
    /// When this value is predicted for
    pub timestamp: DateTime<Utc>,
    /// The predicted value
    pub value: f64,
}

impl ForecastPoint {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// An ordered run of forecast points, ascending by timestamp
///
/// Order is taken from the source; gaps are not validated.
pub type ForecastSeries = Vec<ForecastPoint>;

/// Full payload of the "sensors" topic: the current reading per parameter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SensorSnapshot {
    /// Latest reading per parameter
    pub readings: HashMap<Parameter, SensorReading>,
}

impl SensorSnapshot {
    /// Get the reading for one parameter, if the snapshot carries it
    pub fn reading(&self, parameter: Parameter) -> Option<&SensorReading> {
        self.readings.get(&parameter)
    }
}

/// Full payload of the "predictions" topic: a forecast series per parameter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ForecastSnapshot {
    /// Hourly forecast per parameter
    pub series: HashMap<Parameter, ForecastSeries>,
}

impl ForecastSnapshot {
    /// Get the series for one parameter, if the snapshot carries it
    pub fn series_for(&self, parameter: Parameter) -> Option<&ForecastSeries> {
        self.series.get(&parameter)
    }
}

/// A decoded topic payload
///
/// The variant ties the payload shape to the topic it was published on.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    /// Payload of the "sensors" topic
    Sensors(SensorSnapshot),
    /// Payload of the "predictions" topic
    Predictions(ForecastSnapshot),
}
