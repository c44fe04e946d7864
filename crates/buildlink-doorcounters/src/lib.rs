//! IoT door-counter telemetry
//!
//! Logs in to the door-counter platform, fetches the per-door count series
//! for one device and merges them into one record per timestamp. Also carries
//! the static catalogue of counted entrances.

pub mod client;
pub mod entrances;
pub mod model;

pub use client::DoorCounterClient;
pub use entrances::{entrance, entrances};
pub use model::{DoorCount, Entrance};
