//! View-model derivation
//!
//! Pure snapshot-in/struct-out transforms from raw readings to
//! display-ready structures: localized time labels, display names, trend
//! tokens, and the composed card and chart models. No mutable state, safe
//! to call from any callback.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use super::palette::{color_for_rainfall, series_color, RainfallColor};
use crate::model::{ForecastSeries, Parameter, SensorReading, Trend};

/// Format a timestamp as a localized "HH:MM" label in the viewer's zone
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M").to_string()
}

/// Display name of a parameter, as shown on sensor cards
///
/// Exhaustive over the closed enum; out-of-enum wire values are rejected
/// earlier, at `Parameter::from_str`.
pub fn label_for(parameter: Parameter) -> &'static str {
    match parameter {
        Parameter::Rainfall => "Rainfall",
        Parameter::Moisture => "Soil Moisture",
        Parameter::Humidity => "Humidity",
        Parameter::Pressure => "Pressure",
    }
}

/// Long display name of a parameter, as shown on forecast charts
pub fn series_label(parameter: Parameter) -> &'static str {
    match parameter {
        Parameter::Rainfall => "Rainfall",
        Parameter::Moisture => "Soil Moisture",
        Parameter::Humidity => "Humidity",
        Parameter::Pressure => "Atmospheric Pressure",
    }
}

/// Visual token for a trend direction
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TrendIndicator {
    Rising,
    Falling,
    Flat,
}

impl TrendIndicator {
    /// Arrow glyph for this token
    pub fn glyph(&self) -> &'static str {
        match self {
            TrendIndicator::Rising => "↑",
            TrendIndicator::Falling => "↓",
            TrendIndicator::Flat => "→",
        }
    }

    /// Accent color for this token
    pub fn color(&self) -> &'static str {
        match self {
            TrendIndicator::Rising => "#22C55E",
            TrendIndicator::Falling => "#EF4444",
            TrendIndicator::Flat => "#3B82F6",
        }
    }
}

/// Map a trend direction to its visual token
pub fn trend_indicator(trend: Trend) -> TrendIndicator {
    match trend {
        Trend::Up => TrendIndicator::Rising,
        Trend::Down => TrendIndicator::Falling,
        Trend::Stable => TrendIndicator::Flat,
    }
}

/// Display-ready model of one sensor card
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SensorCardView {
    /// Card title
    pub title: &'static str,
    /// The measured value
    pub value: f64,
    /// Unit of measurement
    pub unit: String,
    /// Trend token
    pub trend: TrendIndicator,
    /// Localized "HH:MM" observation time
    pub updated_at: String,
    /// Intensity color; only rainfall cards carry one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<RainfallColor>,
}

/// Derive the card model for a sensor reading
pub fn sensor_card(reading: &SensorReading) -> SensorCardView {
    let color = match reading.parameter {
        Parameter::Rainfall => Some(color_for_rainfall(reading.value)),
        Parameter::Moisture | Parameter::Humidity | Parameter::Pressure => None,
    };

    SensorCardView {
        title: label_for(reading.parameter),
        value: reading.value,
        unit: reading.unit.clone(),
        trend: trend_indicator(reading.trend),
        updated_at: format_timestamp(reading.observed_at),
        color,
    }
}

/// One chart point: localized time label plus value
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartPoint {
    /// Localized "HH:MM" label
    pub label: String,
    /// Predicted value
    pub value: f64,
}

/// Display-ready model of one forecast chart
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ForecastChartView {
    /// Chart title
    pub title: &'static str,
    /// Line color
    pub color: &'static str,
    /// Points in the order the series was published
    pub points: Vec<ChartPoint>,
}

/// Derive the chart model for a forecast series
///
/// Input order is preserved; the series arrives ascending by timestamp.
pub fn forecast_chart(parameter: Parameter, series: &ForecastSeries) -> ForecastChartView {
    ForecastChartView {
        title: series_label(parameter),
        color: series_color(parameter),
        points: series
            .iter()
            .map(|point| ChartPoint {
                label: format_timestamp(point.timestamp),
                value: point.value,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ForecastPoint;
    use chrono::{Duration, NaiveTime, TimeZone};
    use std::collections::HashSet;

    #[test]
    fn test_labels_distinct_and_non_empty() {
        let labels: HashSet<_> = Parameter::all().iter().map(|p| label_for(*p)).collect();
        assert_eq!(labels.len(), Parameter::all().len());
        assert!(labels.iter().all(|l| !l.is_empty()));
    }

    #[test]
    fn test_trend_tokens() {
        assert_eq!(trend_indicator(Trend::Up), TrendIndicator::Rising);
        assert_eq!(trend_indicator(Trend::Down), TrendIndicator::Falling);
        assert_eq!(trend_indicator(Trend::Stable), TrendIndicator::Flat);
        assert_eq!(TrendIndicator::Rising.glyph(), "↑");
    }

    #[test]
    fn test_format_timestamp_stable_under_reparse() {
        let base = Utc.with_ymd_and_hms(2026, 8, 27, 0, 0, 0).unwrap();
        for minutes in [0i64, 1, 59, 60, 721, 1439] {
            let formatted = format_timestamp(base + Duration::minutes(minutes));
            let parsed = NaiveTime::parse_from_str(&formatted, "%H:%M").unwrap();
            assert_eq!(parsed.format("%H:%M").to_string(), formatted);
        }
    }

    #[test]
    fn test_sensor_card_for_light_rainfall() {
        let reading = SensorReading::new(Parameter::Rainfall, 2.5, "mm", Trend::Up);
        let card = sensor_card(&reading);

        assert_eq!(card.title, "Rainfall");
        assert_eq!(card.value, 2.5);
        assert_eq!(card.unit, "mm");
        assert_eq!(card.trend, TrendIndicator::Rising);
        assert_eq!(card.color, Some(RainfallColor::Light));
    }

    #[test]
    fn test_non_rainfall_card_has_no_intensity_color() {
        let reading = SensorReading::new(Parameter::Humidity, 85.0, "%", Trend::Stable);
        let card = sensor_card(&reading);

        assert_eq!(card.title, "Humidity");
        assert_eq!(card.trend, TrendIndicator::Flat);
        assert_eq!(card.color, None);
    }

    #[test]
    fn test_forecast_chart_preserves_hourly_order() {
        let start = Utc.with_ymd_and_hms(2026, 8, 27, 0, 0, 0).unwrap();
        let series: ForecastSeries = (0..24)
            .map(|hour| ForecastPoint::new(start + Duration::hours(hour), 1012.0 + hour as f64))
            .collect();

        let chart = forecast_chart(Parameter::Pressure, &series);
        assert_eq!(chart.title, "Atmospheric Pressure");
        assert_eq!(chart.points.len(), 24);

        // Values follow input order, which is ascending by timestamp
        for (hour, point) in chart.points.iter().enumerate() {
            assert_eq!(point.value, 1012.0 + hour as f64);
        }
        for pair in series.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }
}
