//! Door-counter client against a mocked platform.

use std::sync::Arc;

use buildlink_core::{DoorCounterConfig, Error, HttpMethod};
use buildlink_doorcounters::DoorCounterClient;
use buildlink_testing::{door_series, MockTransport};
use chrono::{Duration, TimeZone, Utc};
use serde_json::json;

const DEVICE: &str = "dev-1";
const TIMESERIES: &str = "/api/plugins/telemetry/DEVICE/dev-1/values/timeseries";

fn client(mock: &Arc<MockTransport>) -> DoorCounterClient {
    let config = DoorCounterConfig {
        base_url: "http://doors.test:8080/".to_string(),
        device_id: DEVICE.to_string(),
        username: "counter".to_string(),
        password: "pw".to_string(),
    };
    DoorCounterClient::new(mock.clone(), &config)
}

fn logged_in() -> Arc<MockTransport> {
    let mock = Arc::new(MockTransport::new());
    mock.json(HttpMethod::Post, "/api/auth/login", 200, json!({"token": "tok-123"}));
    mock
}

#[tokio::test]
async fn test_counts_merge_and_sort() {
    let mock = logged_in();
    mock.json(
        HttpMethod::Get,
        TIMESERIES,
        200,
        json!({
            "c1": door_series(&[(3000, "4"), (1000, "2")]),
            "c2": door_series(&[(1000, "6")]),
            "c3": door_series(&[(1000, "8"), (2000, "1")]),
        }),
    );
    let client = client(&mock);

    let start = Utc.timestamp_millis_opt(0).unwrap();
    let end = Utc.timestamp_millis_opt(10_000).unwrap();
    let counts = client.counts(start, Some(end)).await.unwrap();

    let timestamps: Vec<i64> = counts.iter().map(|c| c.timestamp.timestamp_millis()).collect();
    assert_eq!(timestamps, [1000, 2000, 3000]);

    let first = &counts[0];
    assert_eq!(first.door_a, Some(2));
    assert_eq!(first.door_c, Some(6));
    assert_eq!(first.door_b, Some(8));

    assert_eq!(counts[1].door_b, Some(1));
    assert_eq!(counts[1].door_a, None);
    assert_eq!(counts[2].door_a, Some(4));
}

#[tokio::test]
async fn test_request_shape() {
    let mock = logged_in();
    mock.json(HttpMethod::Get, TIMESERIES, 200, json!({}));
    let client = client(&mock);

    let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    let end = start + Duration::hours(1);
    let counts = client.counts(start, Some(end)).await.unwrap();
    assert!(counts.is_empty());

    let login = mock.last_request("/api/auth/login").unwrap();
    assert_eq!(login.url, "http://doors.test:8080/api/auth/login");
    assert_eq!(login.json_body, Some(json!({"username": "counter", "password": "pw"})));

    let fetch = mock.last_request(TIMESERIES).unwrap();
    assert_eq!(fetch.header("x-authorization"), Some("Bearer tok-123"));
    assert_eq!(fetch.query_param("keys"), Some("c1,c2,c3"));
    assert_eq!(fetch.query_param("startTs"), Some(start.timestamp_millis().to_string().as_str()));
    assert_eq!(fetch.query_param("endTs"), Some(end.timestamp_millis().to_string().as_str()));
    assert_eq!(fetch.query_param("limit"), Some("1000"));
}

#[tokio::test]
async fn test_login_per_call() {
    let mock = logged_in();
    mock.json(HttpMethod::Get, TIMESERIES, 200, json!({}));
    let client = client(&mock);

    let start = Utc::now() - Duration::minutes(5);
    client.counts(start, None).await.unwrap();
    client.counts(start, None).await.unwrap();

    assert_eq!(mock.calls("/api/auth/login"), 2);
    assert_eq!(mock.calls(TIMESERIES), 2);
}

#[tokio::test]
async fn test_missing_token_is_auth_error() {
    let mock = Arc::new(MockTransport::new());
    mock.json(HttpMethod::Post, "/api/auth/login", 200, json!({"token": ""}));
    let client = client(&mock);

    let result = client.counts(Utc::now() - Duration::hours(1), None).await;
    assert!(matches!(result, Err(Error::Auth(_))));
    assert_eq!(mock.calls(TIMESERIES), 0);
}

#[tokio::test]
async fn test_rejected_login_keeps_status() {
    let mock = Arc::new(MockTransport::new());
    mock.raw(HttpMethod::Post, "/api/auth/login", 401, "Invalid username or password");
    let client = client(&mock);

    match client.counts(Utc::now() - Duration::hours(1), None).await {
        Err(Error::UpstreamStatus { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "Invalid username or password");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_bad_value_aborts() {
    let mock = logged_in();
    mock.json(
        HttpMethod::Get,
        TIMESERIES,
        200,
        json!({"c1": door_series(&[(1000, "12"), (2000, "twelve")])}),
    );
    let client = client(&mock);

    let result = client.counts(Utc::now() - Duration::hours(1), None).await;
    assert!(matches!(result, Err(Error::Decode(_))));
}

#[tokio::test]
async fn test_inverted_range() {
    let mock = logged_in();
    let client = client(&mock);

    let end = Utc::now() - Duration::hours(1);
    let result = client.counts(end + Duration::minutes(1), Some(end)).await;
    assert!(matches!(result, Err(Error::InvalidRange { .. })));
    assert!(mock.requests().is_empty());
}
