//! Region markers
//!
//! The fixed set of map markers shown on the regional overview. Ships with
//! a built-in default set and can load a custom set from a TOML file.
//! Which marker is selected is transient UI state owned by the display
//! layer, not tracked here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::view::{color_for_rainfall, RainfallColor};

/// One map marker: a named region with its current conditions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionMarker {
    /// Unique region name
    pub name: String,
    /// (latitude, longitude)
    pub coordinates: (f64, f64),
    /// Current condition label (e.g. "Partly Cloudy")
    pub condition: String,
    /// Current rainfall in mm
    pub rainfall: f64,
    /// Current humidity percentage
    pub humidity: f64,
    /// Soil moisture percentage, where the region reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moisture: Option<f64>,
    /// Atmospheric pressure in hPa, where the region reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
}

impl RegionMarker {
    /// Marker color, bucketed by current rainfall
    pub fn marker_color(&self) -> RainfallColor {
        color_for_rainfall(self.rainfall)
    }
}

/// Errors that can occur while loading a regions file
#[derive(Error, Debug)]
pub enum RegionsError {
    #[error("Failed to read regions file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse regions file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Duplicate region name: {0}")]
    DuplicateName(String),
}

#[derive(Deserialize)]
struct RegionsFile {
    #[serde(default)]
    region: Vec<RegionMarker>,
}

/// Load region markers from a TOML file
///
/// The file holds `[[region]]` tables. Region names are unique keys;
/// duplicates are rejected.
pub fn load_regions(path: &Path) -> Result<Vec<RegionMarker>, RegionsError> {
    let content = std::fs::read_to_string(path).map_err(|e| RegionsError::Io {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    let file: RegionsFile = toml::from_str(&content).map_err(|e| RegionsError::Parse {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    let mut seen = std::collections::HashSet::new();
    for region in &file.region {
        if !seen.insert(region.name.as_str()) {
            return Err(RegionsError::DuplicateName(region.name.clone()));
        }
    }

    Ok(file.region)
}

/// The built-in region set
pub fn default_regions() -> Vec<RegionMarker> {
    fn marker(
        name: &str,
        coordinates: (f64, f64),
        condition: &str,
        rainfall: f64,
        humidity: f64,
    ) -> RegionMarker {
        RegionMarker {
            name: name.to_string(),
            coordinates,
            condition: condition.to_string(),
            rainfall,
            humidity,
            moisture: None,
            pressure: None,
        }
    }

    vec![
        marker("Delhi", (28.6139, 77.2090), "Partly Cloudy", 0.0, 65.0),
        marker("Mumbai", (19.0760, 72.8777), "Thunderstorm", 15.0, 90.0),
        marker("Chennai", (13.0827, 80.2707), "Clear", 0.0, 78.0),
        marker("Kolkata", (22.5726, 88.3639), "Heavy Rain", 25.0, 92.0),
        marker("Bangalore", (12.9716, 77.5946), "Moderate Rain", 8.0, 82.0),
        marker("Hyderabad", (17.3850, 78.4867), "Light Rain", 3.0, 70.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_regions_have_unique_names() {
        let regions = default_regions();
        let names: std::collections::HashSet<_> =
            regions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names.len(), regions.len());
    }

    #[test]
    fn test_marker_colors() {
        let regions = default_regions();
        let by_name = |name: &str| regions.iter().find(|r| r.name == name).unwrap();

        assert_eq!(by_name("Delhi").marker_color(), RainfallColor::Clear);
        assert_eq!(by_name("Hyderabad").marker_color(), RainfallColor::Light);
        assert_eq!(by_name("Bangalore").marker_color(), RainfallColor::Moderate);
        assert_eq!(by_name("Kolkata").marker_color(), RainfallColor::Heavy);
    }

    #[test]
    fn test_load_regions_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[region]]
name = "Pune"
coordinates = [18.5204, 73.8567]
condition = "Drizzle"
rainfall = 1.2
humidity = 74.0
moisture = 61.0

[[region]]
name = "Jaipur"
coordinates = [26.9124, 75.7873]
condition = "Clear"
rainfall = 0.0
humidity = 40.0
"#
        )
        .unwrap();

        let regions = load_regions(file.path()).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].name, "Pune");
        assert_eq!(regions[0].moisture, Some(61.0));
        assert_eq!(regions[1].pressure, None);
    }

    #[test]
    fn test_duplicate_region_name_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[region]]
name = "Pune"
coordinates = [18.5204, 73.8567]
condition = "Drizzle"
rainfall = 1.2
humidity = 74.0

[[region]]
name = "Pune"
coordinates = [18.5, 73.8]
condition = "Clear"
rainfall = 0.0
humidity = 50.0
"#
        )
        .unwrap();

        let err = load_regions(file.path()).unwrap_err();
        assert!(matches!(err, RegionsError::DuplicateName(ref name) if name == "Pune"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_regions(Path::new("/nonexistent/regions.toml")).unwrap_err();
        assert!(matches!(err, RegionsError::Io { .. }));
    }
}
