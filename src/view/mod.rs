//! View-model derivation
//!
//! Pure functions mapping raw readings and forecast series to
//! display-ready structures. Rendering itself lives outside this crate;
//! every struct here is `Serialize` so a display layer can take it as-is.

mod model;
mod palette;

pub use model::{
    forecast_chart, format_timestamp, label_for, sensor_card, series_label, trend_indicator,
    ChartPoint, ForecastChartView, SensorCardView, TrendIndicator,
};
pub use palette::{color_for_rainfall, series_color, RainfallColor};
