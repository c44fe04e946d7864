//! BMS wire records and derived hierarchy entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sensor as listed by the BMS `/metadata` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(rename = "externallogid")]
    pub external_id: i32,
    pub source: String,
    pub unit: String,
}

/// One sample as returned by the BMS `/trenddata` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRecord {
    #[serde(rename = "externallogid")]
    pub external_id: i32,
    /// `YYYY-MM-DD HH:MM:SS`, no zone
    pub timestamp: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Building {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Floor {
    pub id: String,
    pub building_id: String,
}

/// A room, addressed by its full ancestry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub floor_id: String,
    pub building_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sensor {
    /// Decimal rendering of the BMS `externallogid`
    pub external_id: String,
    pub source_path: String,
    pub unit: String,
    /// Last segment of the source path
    #[serde(rename = "type")]
    pub sensor_type: String,
    pub room_id: String,
}

/// A single trend sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}
