//! Snapshot decoding
//!
//! Validated decode from raw feed payloads into typed snapshots.
//! The upstream source publishes loosely-shaped JSON; everything is checked
//! here at the boundary so the view layer never sees undefined fields.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::error::{DecodeError, DecodeResult};
use super::types::{
    ForecastPoint, ForecastSeries, ForecastSnapshot, Parameter, SensorReading, SensorSnapshot,
    Snapshot, Trend,
};
use crate::feed::Topic;

/// Decode the raw payload published at a topic into a typed snapshot
pub fn decode_snapshot(topic: Topic, payload: &Value) -> DecodeResult<Snapshot> {
    match topic {
        Topic::Sensors => decode_sensor_snapshot(payload).map(Snapshot::Sensors),
        Topic::Predictions => decode_forecast_snapshot(payload).map(Snapshot::Predictions),
    }
}

/// Decode a "sensors" payload: a map from parameter name to reading
pub fn decode_sensor_snapshot(payload: &Value) -> DecodeResult<SensorSnapshot> {
    let object = payload.as_object().ok_or_else(|| {
        DecodeError::MalformedSnapshot(format!(
            "sensors payload must be an object, got {}",
            type_name(payload)
        ))
    })?;

    let mut snapshot = SensorSnapshot::default();
    for (key, raw) in object {
        let parameter: Parameter = key.parse()?;
        let reading = decode_reading(parameter, raw)?;
        snapshot.readings.insert(parameter, reading);
    }

    Ok(snapshot)
}

/// Decode a "predictions" payload: a map from parameter name to point series
pub fn decode_forecast_snapshot(payload: &Value) -> DecodeResult<ForecastSnapshot> {
    let object = payload.as_object().ok_or_else(|| {
        DecodeError::MalformedSnapshot(format!(
            "predictions payload must be an object, got {}",
            type_name(payload)
        ))
    })?;

    let mut snapshot = ForecastSnapshot::default();
    for (key, raw) in object {
        let parameter: Parameter = key.parse()?;
        let series = decode_series(parameter, raw)?;
        snapshot.series.insert(parameter, series);
    }

    Ok(snapshot)
}

fn decode_reading(parameter: Parameter, raw: &Value) -> DecodeResult<SensorReading> {
    let object = raw.as_object().ok_or_else(|| {
        DecodeError::MalformedSnapshot(format!(
            "{} reading must be an object, got {}",
            parameter,
            type_name(raw)
        ))
    })?;

    let value = require_number(object.get("value"), parameter, "value")?;
    let unit = object
        .get("unit")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            DecodeError::MalformedSnapshot(format!("{} reading is missing a string unit", parameter))
        })?
        .to_string();
    let trend: Trend = object
        .get("trend")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            DecodeError::MalformedSnapshot(format!("{} reading is missing a trend", parameter))
        })?
        .parse()?;
    let observed_at = object
        .get("lastUpdated")
        .or_else(|| object.get("observed_at"))
        .ok_or_else(|| {
            DecodeError::MalformedSnapshot(format!("{} reading is missing a timestamp", parameter))
        })
        .and_then(decode_timestamp)?;

    Ok(SensorReading {
        parameter,
        value,
        unit,
        trend,
        observed_at,
    })
}

fn decode_series(parameter: Parameter, raw: &Value) -> DecodeResult<ForecastSeries> {
    let entries = raw.as_array().ok_or_else(|| {
        DecodeError::MalformedSnapshot(format!(
            "{} forecast must be an array, got {}",
            parameter,
            type_name(raw)
        ))
    })?;

    let mut series = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let object = entry.as_object().ok_or_else(|| {
            DecodeError::MalformedSnapshot(format!(
                "{} forecast point {} must be an object",
                parameter, index
            ))
        })?;

        let timestamp = object
            .get("time")
            .or_else(|| object.get("timestamp"))
            .ok_or_else(|| {
                DecodeError::MalformedSnapshot(format!(
                    "{} forecast point {} is missing a timestamp",
                    parameter, index
                ))
            })
            .and_then(decode_timestamp)?;
        let value = require_number(object.get("value"), parameter, "value")?;

        series.push(ForecastPoint::new(timestamp, value));
    }

    Ok(series)
}

/// Decode a timestamp value
///
/// The source publishes RFC 3339 strings; epoch milliseconds are also
/// accepted for tooling parity.
fn decode_timestamp(raw: &Value) -> DecodeResult<DateTime<Utc>> {
    match raw {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                DecodeError::MalformedSnapshot(format!("invalid timestamp {:?}: {}", s, e))
            }),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .ok_or_else(|| {
                DecodeError::MalformedSnapshot(format!("invalid epoch timestamp: {}", n))
            }),
        other => Err(DecodeError::MalformedSnapshot(format!(
            "timestamp must be a string or number, got {}",
            type_name(other)
        ))),
    }
}

fn require_number(raw: Option<&Value>, parameter: Parameter, field: &str) -> DecodeResult<f64> {
    raw.and_then(Value::as_f64).ok_or_else(|| {
        DecodeError::MalformedSnapshot(format!(
            "{} is missing a numeric {} field",
            parameter, field
        ))
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
