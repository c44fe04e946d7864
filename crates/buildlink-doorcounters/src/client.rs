//! Door-counter platform client.

use std::collections::BTreeMap;
use std::sync::Arc;

use buildlink_core::config::normalize_base_url;
use buildlink_core::{DecodeError, DoorCounterConfig, Error, HttpRequest, HttpTransport, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::model::{Door, DoorCount, LoginRequest, LoginResponse, TelemetryResponse};

const LOGIN_ENDPOINT: &str = "/api/auth/login";
const SAMPLE_LIMIT: u32 = 1000;

/// Client for one door-counter device.
///
/// Every [`counts`](Self::counts) call logs in first; tokens are not reused.
#[derive(Clone)]
pub struct DoorCounterClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    device_id: String,
    username: String,
    password: String,
}

impl DoorCounterClient {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &DoorCounterConfig) -> Self {
        Self {
            transport,
            base_url: normalize_base_url(&config.base_url),
            device_id: config.device_id.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }

    /// Door counts between `start` and `end` (now when absent), oldest first.
    pub async fn counts(
        &self,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<DoorCount>> {
        let end = end.unwrap_or_else(Utc::now);
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }

        let token = self.login().await?;

        let request = HttpRequest::get(self.timeseries_url())
            .with_query("keys", Door::KEYS)
            .with_query("startTs", start.timestamp_millis().to_string())
            .with_query("endTs", end.timestamp_millis().to_string())
            .with_query("limit", SAMPLE_LIMIT.to_string())
            .with_header("X-Authorization", format!("Bearer {}", token));

        let response = self.transport.send(request).await?.error_for_status()?;
        let series: TelemetryResponse = response.json()?;

        let counts = merge_series(series)?;
        debug!(device = %self.device_id, rows = counts.len(), "Door counts received");
        Ok(counts)
    }

    async fn login(&self) -> Result<String> {
        let body = serde_json::to_value(LoginRequest {
            username: &self.username,
            password: &self.password,
        })?;
        let request = HttpRequest::post_json(format!("{}{}", self.base_url, LOGIN_ENDPOINT), body)
            .with_header("Content-Type", "application/json");

        let response = self.transport.send(request).await?.error_for_status()?;
        let login: LoginResponse = response.json()?;
        if login.token.is_empty() {
            warn!(user = %self.username, "Door-counter login returned no token");
            return Err(Error::Auth("Failed to retrieve auth token".to_string()));
        }
        Ok(login.token)
    }

    fn timeseries_url(&self) -> String {
        format!(
            "{}/api/plugins/telemetry/DEVICE/{}/values/timeseries",
            self.base_url, self.device_id
        )
    }
}

/// Merge per-key series into one record per timestamp, sorted by time.
fn merge_series(series: TelemetryResponse) -> Result<Vec<DoorCount>> {
    let mut merged: BTreeMap<i64, DoorCount> = BTreeMap::new();

    for (key, samples) in series {
        let Some(door) = Door::from_key(&key) else {
            debug!(key = %key, "Ignoring unknown telemetry key");
            continue;
        };
        for sample in samples {
            let value = sample.value.trim().parse::<i32>().map_err(|_| DecodeError::Value {
                key: key.clone(),
                value: sample.value.clone(),
            })?;
            let timestamp = DateTime::from_timestamp_millis(sample.ts).ok_or_else(|| DecodeError::Timestamp {
                value: sample.ts.to_string(),
                reason: "epoch milliseconds out of range".to_string(),
            })?;
            merged
                .entry(sample.ts)
                .or_insert_with(|| DoorCount::empty(timestamp))
                .set(door, value);
        }
    }

    Ok(merged.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TelemetrySample;

    fn series(rows: &[(&str, i64, &str)]) -> TelemetryResponse {
        let mut series = TelemetryResponse::new();
        for (key, ts, value) in rows {
            series.entry(key.to_string()).or_default().push(TelemetrySample {
                ts: *ts,
                value: value.to_string(),
            });
        }
        series
    }

    #[test]
    fn test_merge_by_timestamp() {
        let counts = merge_series(series(&[
            ("c1", 2000, "5"),
            ("c2", 1000, "7"),
            ("c3", 2000, "9"),
            ("c1", 1000, "1"),
        ]))
        .unwrap();

        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].timestamp.timestamp_millis(), 1000);
        assert_eq!((counts[0].door_a, counts[0].door_b, counts[0].door_c), (Some(1), None, Some(7)));
        assert_eq!((counts[1].door_a, counts[1].door_b, counts[1].door_c), (Some(5), Some(9), None));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let counts = merge_series(series(&[("battery", 1000, "88")])).unwrap();
        assert!(counts.is_empty());
    }

    #[test]
    fn test_unparsable_value() {
        match merge_series(series(&[("c3", 1000, "n/a")])) {
            Err(Error::Decode(DecodeError::Value { key, value })) => {
                assert_eq!(key, "c3");
                assert_eq!(value, "n/a");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
