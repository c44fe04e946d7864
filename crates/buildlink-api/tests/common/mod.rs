//! Common test utilities for API tests.

use std::sync::Arc;

use buildlink_api::ServerState;
use buildlink_core::{AppConfig, BmsConfig, DoorCounterConfig};
use buildlink_testing::MockTransport;

#[allow(dead_code)]
pub const DOOR_TIMESERIES: &str = "/api/plugins/telemetry/DEVICE/dev-1/values/timeseries";

/// Configuration pointing both sources at test hosts.
pub fn test_config() -> AppConfig {
    AppConfig {
        bms: BmsConfig {
            base_url: "http://bms.test/api/v1".to_string(),
            username: "svc".to_string(),
            password: "secret".to_string(),
        },
        door_counters: DoorCounterConfig {
            base_url: "http://doors.test:8080".to_string(),
            device_id: "dev-1".to_string(),
            username: "counter".to_string(),
            password: "pw".to_string(),
        },
        ..AppConfig::default()
    }
}

/// Create a server state backed by a scripted transport.
pub fn create_test_server_state() -> (Arc<MockTransport>, ServerState) {
    let mock = Arc::new(MockTransport::new());
    let state = ServerState::new(mock.clone(), &test_config());
    (mock, state)
}
