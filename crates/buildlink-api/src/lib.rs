//! HTTP API for BuildLink.
//!
//! Serves the BMS building hierarchy, per-sensor trend data and door-counter
//! counts as JSON. Every endpoint answers with the [`models::ApiResponse`]
//! envelope.

pub mod handlers;
pub mod models;
pub mod server;

pub use server::{create_router_with_state, run, ServerState};
