//! API handlers organized by domain.

pub mod basic;
pub mod common;
pub mod doorcounters;
pub mod hierarchy;
pub mod sensors;

pub use crate::server::ServerState;

pub use basic::{health_handler, health_status_handler};
pub use doorcounters::{door_counts_handler, get_entrance_handler, list_entrances_handler};
pub use hierarchy::{
    list_buildings_handler, list_floors_handler, list_rooms_handler, list_sensors_handler,
    refresh_metadata_handler, tree_handler,
};
pub use sensors::sensor_values_handler;
