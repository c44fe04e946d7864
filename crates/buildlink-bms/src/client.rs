//! Authenticated access to the BMS REST API.

use std::sync::Arc;

use async_trait::async_trait;
use buildlink_core::config::normalize_base_url;
use buildlink_core::{BasicAuth, BmsConfig, HttpRequest, HttpTransport, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::cache::MetadataSource;
use crate::model::{MetadataRecord, TrendRecord};

/// BMS API client.
///
/// Every request carries basic authentication. Non-2xx answers become
/// [`buildlink_core::Error::UpstreamStatus`] with the response body attached.
#[derive(Clone)]
pub struct BmsClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    auth: BasicAuth,
}

impl BmsClient {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &BmsConfig) -> Self {
        Self {
            transport,
            base_url: normalize_base_url(&config.base_url),
            auth: config.credentials(),
        }
    }

    /// List every sensor known to the BMS.
    pub async fn metadata(&self) -> Result<Vec<MetadataRecord>> {
        self.get_json(HttpRequest::get(self.url("metadata"))).await
    }

    /// Raw trend samples for one sensor between two instants.
    pub async fn trend_data(
        &self,
        external_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TrendRecord>> {
        let request = HttpRequest::get(self.url("trenddata"))
            .with_query("externallogid", external_id)
            .with_query("starttime", start.to_rfc3339_opts(SecondsFormat::Secs, true))
            .with_query("endtime", end.to_rfc3339_opts(SecondsFormat::Secs, true));
        self.get_json(request).await
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn get_json<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T> {
        let request = request.with_basic_auth(self.auth.clone());
        debug!(url = %request.url, "BMS request");
        let response = self.transport.send(request).await?.error_for_status()?;
        response.json()
    }
}

#[async_trait]
impl MetadataSource for BmsClient {
    async fn fetch_metadata(&self) -> Result<Vec<MetadataRecord>> {
        self.metadata().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildlink_core::{Error, HttpMethod};
    use buildlink_testing::{metadata_payload, MockTransport};
    use chrono::TimeZone;
    use serde_json::json;

    fn config() -> BmsConfig {
        BmsConfig {
            base_url: "http://bms.test/api/v1/".to_string(),
            username: "svc".to_string(),
            password: "pw".to_string(),
        }
    }

    #[tokio::test]
    async fn test_metadata_request_uses_basic_auth() {
        let mock = Arc::new(MockTransport::new());
        mock.json(
            HttpMethod::Get,
            "/api/v1/metadata",
            200,
            metadata_payload(&[(1, "/B1_F1_R1/sensors/Temp", "C")]),
        );
        let client = BmsClient::new(mock.clone(), &config());

        let records = client.metadata().await.unwrap();
        assert_eq!(records.len(), 1);

        let request = mock.last_request("/metadata").unwrap();
        assert_eq!(request.url, "http://bms.test/api/v1/metadata");
        assert_eq!(request.basic_auth, Some(BasicAuth::new("svc", "pw")));
    }

    #[tokio::test]
    async fn test_trend_query_parameters() {
        let mock = Arc::new(MockTransport::new());
        mock.json(HttpMethod::Get, "/trenddata", 200, json!([]));
        let client = BmsClient::new(mock.clone(), &config());

        let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 2, 6, 30, 0).unwrap();
        client.trend_data("42", start, end).await.unwrap();

        let request = mock.last_request("/trenddata").unwrap();
        assert_eq!(request.query_param("externallogid"), Some("42"));
        assert_eq!(request.query_param("starttime"), Some("2025-03-01T00:00:00Z"));
        assert_eq!(request.query_param("endtime"), Some("2025-03-02T06:30:00Z"));
    }

    #[tokio::test]
    async fn test_non_success_status_keeps_body() {
        let mock = Arc::new(MockTransport::new());
        mock.raw(HttpMethod::Get, "/metadata", 401, "bad credentials");
        let client = BmsClient::new(mock, &config());

        match client.metadata().await {
            Err(Error::UpstreamStatus { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad credentials");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let mock = Arc::new(MockTransport::new());
        mock.raw(HttpMethod::Get, "/metadata", 200, r#"[{"externallogid": "x"}]"#);
        let client = BmsClient::new(mock, &config());

        assert!(matches!(client.metadata().await, Err(Error::Json(_))));
    }
}
