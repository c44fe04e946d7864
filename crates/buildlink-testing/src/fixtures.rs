//! Wire-format payload builders.

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

/// BMS trend timestamp format.
const TREND_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Build a BMS `/metadata` payload from `(externallogid, source, unit)` rows.
pub fn metadata_payload(rows: &[(i32, &str, &str)]) -> Value {
    Value::Array(
        rows.iter()
            .map(|(id, source, unit)| {
                json!({
                    "externallogid": id,
                    "source": source,
                    "unit": unit,
                })
            })
            .collect(),
    )
}

/// Shape of generated trend values.
#[derive(Debug, Clone, Copy)]
pub enum TrendPattern {
    Constant { base: f64 },
    Linear { start: f64, slope: f64 },
}

/// Build a BMS `/trenddata` payload of `points` samples spaced `interval` apart.
pub fn trend_payload(
    external_id: i32,
    start: DateTime<Utc>,
    points: usize,
    interval: Duration,
    pattern: TrendPattern,
) -> Value {
    Value::Array(
        (0..points)
            .map(|i| {
                let timestamp = start + interval * i as i32;
                let value = match pattern {
                    TrendPattern::Constant { base } => base,
                    TrendPattern::Linear { start, slope } => start + slope * i as f64,
                };
                json!({
                    "externallogid": external_id,
                    "timestamp": timestamp.format(TREND_TIMESTAMP_FORMAT).to_string(),
                    "value": value,
                })
            })
            .collect(),
    )
}

/// Build a door-counter series for one key: `[{ts, value}]` with string values.
pub fn door_series(rows: &[(i64, &str)]) -> Value {
    Value::Array(
        rows.iter()
            .map(|(ts, value)| json!({ "ts": ts, "value": value }))
            .collect(),
    )
}
