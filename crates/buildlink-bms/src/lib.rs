//! Building-management-system telemetry
//!
//! Resolves a flat list of BMS sensor records into a building hierarchy and
//! fetches per-sensor trend data on demand.
//!
//! ## Architecture
//!
//! - **path**: decodes a sensor source path into building / floor / room / sensor type
//! - **MetadataCache**: single-flight, memoized fetch of the full sensor list
//! - **HierarchyIndex**: buildings, floors, rooms and sensors derived from the cached list
//! - **TimeSeriesFetcher**: uncached trend-data lookups for one sensor
//! - **BmsService**: wires the above together over one [`BmsClient`]
//!
//! Derived entities are never stored. Every hierarchy query recomputes them
//! from the cached record list, so they cannot drift from it.

pub mod cache;
pub mod client;
pub mod hierarchy;
pub mod model;
pub mod path;
pub mod service;
pub mod timeseries;

pub use cache::{MetadataCache, MetadataSource};
pub use client::BmsClient;
pub use hierarchy::{BuildingNode, FloorNode, HierarchyIndex, RoomNode};
pub use model::{Building, Floor, MetadataRecord, Room, Sensor, TimeSeriesPoint, TrendRecord};
pub use path::{decode, DecodedPath, UNDEFINED};
pub use service::BmsService;
pub use timeseries::TimeSeriesFetcher;
