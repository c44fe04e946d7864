//! Shared server state.

use std::sync::Arc;

use buildlink_bms::BmsService;
use buildlink_core::{AppConfig, HttpTransport};
use buildlink_doorcounters::DoorCounterClient;

/// State handed to every handler.
#[derive(Clone)]
pub struct ServerState {
    pub bms: BmsService,
    pub doors: DoorCounterClient,
    /// Unix timestamp of server start
    pub started_at: i64,
}

impl ServerState {
    /// Build the state over one outbound transport.
    pub fn new(transport: Arc<dyn HttpTransport>, config: &AppConfig) -> Self {
        Self {
            bms: BmsService::new(transport.clone(), &config.bms),
            doors: DoorCounterClient::new(transport, &config.door_counters),
            started_at: chrono::Utc::now().timestamp(),
        }
    }
}
