//! Color mapping
//!
//! Fixed display colors: rainfall intensity buckets for map markers and
//! per-parameter line colors for forecast charts.

use serde::Serialize;

use crate::model::Parameter;

/// Map-marker color bucket for a rainfall amount
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RainfallColor {
    /// No rain
    Clear,
    /// Light rain, under 5 mm
    Light,
    /// Moderate rain, 5 to under 15 mm
    Moderate,
    /// Heavy rain, 15 mm and up
    Heavy,
}

impl RainfallColor {
    /// Hex color for this bucket
    pub fn hex(&self) -> &'static str {
        match self {
            RainfallColor::Clear => "#4ADE80",
            RainfallColor::Light => "#60A5FA",
            RainfallColor::Moderate => "#818CF8",
            RainfallColor::Heavy => "#F87171",
        }
    }
}

/// Bucket a rainfall amount (mm) into one of the four marker colors
///
/// Boundaries are half-open on the lower bound: exactly 5 mm is Moderate
/// and exactly 15 mm is Heavy.
pub fn color_for_rainfall(mm: f64) -> RainfallColor {
    if mm <= 0.0 {
        RainfallColor::Clear
    } else if mm < 5.0 {
        RainfallColor::Light
    } else if mm < 15.0 {
        RainfallColor::Moderate
    } else {
        RainfallColor::Heavy
    }
}

/// Chart line color for a parameter's forecast series
pub fn series_color(parameter: Parameter) -> &'static str {
    match parameter {
        Parameter::Rainfall => "#1EAEDB",
        Parameter::Moisture => "#4ADE80",
        Parameter::Humidity => "#9b87f5",
        Parameter::Pressure => "#F59E0B",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rainfall_boundaries() {
        let cases = [
            (0.0, RainfallColor::Clear),
            (4.999, RainfallColor::Light),
            (5.0, RainfallColor::Moderate),
            (14.999, RainfallColor::Moderate),
            (15.0, RainfallColor::Heavy),
            (100.0, RainfallColor::Heavy),
        ];

        for (mm, expected) in cases {
            assert_eq!(color_for_rainfall(mm), expected, "at {} mm", mm);
        }
    }

    #[test]
    fn test_bucket_colors_distinct() {
        let hexes = [
            RainfallColor::Clear.hex(),
            RainfallColor::Light.hex(),
            RainfallColor::Moderate.hex(),
            RainfallColor::Heavy.hex(),
        ];
        for (i, a) in hexes.iter().enumerate() {
            for b in &hexes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_series_colors_cover_all_parameters() {
        for param in Parameter::all() {
            assert!(series_color(*param).starts_with('#'));
        }
    }
}
