//! Typed domain data
//!
//! The data model shared by the feed and view layers:
//!
//! - **Types**: closed `Parameter`/`Trend` enums, sensor readings and
//!   forecast series, and the snapshot containers published per topic
//! - **Decode**: validated conversion from raw feed payloads into typed
//!   snapshots (parse, don't trust)

mod decode;
mod error;
mod types;

pub use decode::{decode_forecast_snapshot, decode_sensor_snapshot, decode_snapshot};
pub use error::{DecodeError, DecodeResult};
pub use types::{
    ForecastPoint, ForecastSeries, ForecastSnapshot, Parameter, SensorReading, SensorSnapshot,
    Snapshot, Trend,
};
