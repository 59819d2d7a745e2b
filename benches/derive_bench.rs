//! Benchmarks for snapshot decode and view derivation
//!
//! Run with: cargo bench

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use serde_json::json;

use monsoon::model::{decode_sensor_snapshot, ForecastPoint, ForecastSeries, Parameter};
use monsoon::view::{color_for_rainfall, forecast_chart, sensor_card};

fn sensors_payload() -> serde_json::Value {
    json!({
        "rainfall": { "value": 2.5, "unit": "mm", "trend": "up", "lastUpdated": "2026-08-27T06:30:00Z" },
        "moisture": { "value": 68.0, "unit": "%", "trend": "stable", "lastUpdated": "2026-08-27T06:30:00Z" },
        "humidity": { "value": 85.0, "unit": "%", "trend": "up", "lastUpdated": "2026-08-27T06:30:00Z" },
        "pressure": { "value": 1012.0, "unit": "hPa", "trend": "down", "lastUpdated": "2026-08-27T06:30:00Z" }
    })
}

fn hourly_series(hours: i64) -> ForecastSeries {
    let start = Utc.with_ymd_and_hms(2026, 8, 27, 0, 0, 0).unwrap();
    (0..hours)
        .map(|h| ForecastPoint::new(start + Duration::hours(h), 1012.0 + h as f64))
        .collect()
}

fn bench_decode(c: &mut Criterion) {
    let payload = sensors_payload();

    c.bench_function("decode_sensor_snapshot", |b| {
        b.iter(|| decode_sensor_snapshot(black_box(&payload)).unwrap())
    });
}

fn bench_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("derivation");

    let snapshot = decode_sensor_snapshot(&sensors_payload()).unwrap();
    let reading = snapshot.reading(Parameter::Rainfall).unwrap().clone();

    group.bench_function("sensor_card", |b| {
        b.iter(|| sensor_card(black_box(&reading)))
    });

    group.bench_function("color_for_rainfall", |b| {
        b.iter(|| color_for_rainfall(black_box(7.3)))
    });

    for hours in [24, 168] {
        let series = hourly_series(hours);
        group.throughput(Throughput::Elements(hours as u64));
        group.bench_function(format!("forecast_chart_{}", hours), |b| {
            b.iter(|| forecast_chart(Parameter::Pressure, black_box(&series)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_derivation);
criterion_main!(benches);
