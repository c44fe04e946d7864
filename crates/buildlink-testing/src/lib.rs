//! Testing utilities for BuildLink
//!
//! This crate provides testing tools including:
//! - A scripted HTTP transport that stands in for upstream telemetry APIs
//! - Payload builders for the BMS and door-counter wire formats

pub mod fixtures;
pub mod mock_transport;

pub use fixtures::{door_series, metadata_payload, trend_payload, TrendPattern};
pub use mock_transport::MockTransport;
