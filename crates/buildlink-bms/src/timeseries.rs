//! Per-sensor trend data.

use buildlink_core::{DecodeError, Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

use crate::client::BmsClient;
use crate::model::{TimeSeriesPoint, TrendRecord};

/// BMS trend timestamps carry no zone and are read as UTC.
const TREND_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Uncached trend-data lookups.
#[derive(Clone)]
pub struct TimeSeriesFetcher {
    client: BmsClient,
}

impl TimeSeriesFetcher {
    pub fn new(client: BmsClient) -> Self {
        Self { client }
    }

    /// Values of one sensor between `start` and `end` (now when absent),
    /// in the order the BMS returns them.
    pub async fn values(
        &self,
        external_id: &str,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<TimeSeriesPoint>> {
        let end = end.unwrap_or_else(Utc::now);
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }

        let records = self.client.trend_data(external_id, start, end).await?;
        debug!(sensor = external_id, samples = records.len(), "Trend data received");

        records.iter().map(to_point).collect()
    }
}

fn to_point(record: &TrendRecord) -> Result<TimeSeriesPoint> {
    let timestamp = parse_timestamp(&record.timestamp)?;
    Ok(TimeSeriesPoint {
        timestamp,
        value: record.value,
    })
}

fn parse_timestamp(value: &str) -> std::result::Result<DateTime<Utc>, DecodeError> {
    NaiveDateTime::parse_from_str(value, TREND_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| DecodeError::Timestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}
