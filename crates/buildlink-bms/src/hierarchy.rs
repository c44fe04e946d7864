//! Building hierarchy derived from sensor metadata.
//!
//! Every query reads the cached record list, decodes each source path, keeps
//! the records under the requested parent, deduplicates by derived identity
//! and finally applies the caller's id filter. One decode failure fails the
//! whole query.
//!
//! Results keep the order in which entities first appear in the metadata, so
//! repeated queries over the same list return identical sequences.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::Arc;

use buildlink_core::Result;
use serde::Serialize;

use crate::cache::MetadataCache;
use crate::model::{Building, Floor, MetadataRecord, Room, Sensor};
use crate::path::{decode, DecodedPath};

/// An entity that can be listed at some hierarchy level.
trait LevelEntity {
    type Key: Eq + Hash;

    /// Identity used for deduplication, including ancestry.
    fn key(&self) -> Self::Key;

    /// Id compared against caller filters.
    fn filter_id(&self) -> &str;
}

impl LevelEntity for Building {
    type Key = String;

    fn key(&self) -> Self::Key {
        self.id.clone()
    }

    fn filter_id(&self) -> &str {
        &self.id
    }
}

impl LevelEntity for Floor {
    type Key = (String, String);

    fn key(&self) -> Self::Key {
        (self.building_id.clone(), self.id.clone())
    }

    fn filter_id(&self) -> &str {
        &self.id
    }
}

impl LevelEntity for Room {
    type Key = (String, String, String);

    fn key(&self) -> Self::Key {
        (self.building_id.clone(), self.floor_id.clone(), self.id.clone())
    }

    fn filter_id(&self) -> &str {
        &self.id
    }
}

impl LevelEntity for Sensor {
    type Key = (String, String);

    fn key(&self) -> Self::Key {
        (self.external_id.clone(), self.source_path.clone())
    }

    fn filter_id(&self) -> &str {
        &self.external_id
    }
}

/// Empty or absent filter matches everything.
fn matches_filter(filter: Option<&[String]>, id: &str) -> bool {
    match filter {
        None => true,
        Some([]) => true,
        Some(ids) => ids.iter().any(|f| f == id),
    }
}

/// Decode, select, deduplicate and filter one hierarchy level.
fn resolve_level<E, F>(records: &[MetadataRecord], filter: Option<&[String]>, select: F) -> Result<Vec<E>>
where
    E: LevelEntity,
    F: Fn(&DecodedPath, &MetadataRecord) -> Option<E>,
{
    let mut seen = HashSet::new();
    let mut entities = Vec::new();

    for record in records {
        let decoded = decode(&record.source)?;
        let Some(entity) = select(&decoded, record) else {
            continue;
        };
        if seen.insert(entity.key()) {
            entities.push(entity);
        }
    }

    entities.retain(|e| matches_filter(filter, e.filter_id()));
    Ok(entities)
}

fn building_of(d: &DecodedPath) -> Building {
    Building {
        id: d.building_id.clone(),
    }
}

fn floor_of(d: &DecodedPath) -> Floor {
    Floor {
        id: d.floor_id.clone(),
        building_id: d.building_id.clone(),
    }
}

fn room_of(d: &DecodedPath) -> Room {
    Room {
        id: d.room_id.clone(),
        floor_id: d.floor_id.clone(),
        building_id: d.building_id.clone(),
    }
}

fn sensor_of(d: &DecodedPath, record: &MetadataRecord) -> Sensor {
    Sensor {
        external_id: record.external_id.to_string(),
        source_path: record.source.clone(),
        unit: record.unit.clone(),
        sensor_type: d.sensor_type.clone(),
        room_id: d.room_id.clone(),
    }
}

/// A room with its sensors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomNode {
    #[serde(flatten)]
    pub room: Room,
    pub sensors: Vec<Sensor>,
}

/// A floor with its rooms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloorNode {
    #[serde(flatten)]
    pub floor: Floor,
    pub rooms: Vec<RoomNode>,
}

/// A building with its floors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingNode {
    #[serde(flatten)]
    pub building: Building,
    pub floors: Vec<FloorNode>,
}

/// Hierarchy queries over the cached metadata list.
#[derive(Clone)]
pub struct HierarchyIndex {
    cache: Arc<MetadataCache>,
}

impl HierarchyIndex {
    pub fn new(cache: Arc<MetadataCache>) -> Self {
        Self { cache }
    }

    /// All buildings.
    pub async fn buildings(&self, filter: Option<&[String]>) -> Result<Vec<Building>> {
        let records = self.cache.fetch().await?;
        resolve_level(&records, filter, |d, _| Some(building_of(d)))
    }

    /// Floors of one building.
    pub async fn floors(&self, building_id: &str, filter: Option<&[String]>) -> Result<Vec<Floor>> {
        let records = self.cache.fetch().await?;
        resolve_level(&records, filter, |d, _| {
            (d.building_id == building_id).then(|| floor_of(d))
        })
    }

    /// Rooms of one floor, scoped to the floor's building.
    pub async fn rooms(&self, floor: &Floor, filter: Option<&[String]>) -> Result<Vec<Room>> {
        let records = self.cache.fetch().await?;
        resolve_level(&records, filter, |d, _| {
            (d.building_id == floor.building_id && d.floor_id == floor.id).then(|| room_of(d))
        })
    }

    /// Rooms on every floor named `floor_id`, across all buildings.
    pub async fn rooms_of_floor_id(&self, floor_id: &str, filter: Option<&[String]>) -> Result<Vec<Room>> {
        let records = self.cache.fetch().await?;
        resolve_level(&records, filter, |d, _| (d.floor_id == floor_id).then(|| room_of(d)))
    }

    /// Sensors of one room, scoped to the room's floor and building.
    pub async fn sensors(&self, room: &Room, filter: Option<&[String]>) -> Result<Vec<Sensor>> {
        let records = self.cache.fetch().await?;
        resolve_level(&records, filter, |d, record| {
            (d.building_id == room.building_id && d.floor_id == room.floor_id && d.room_id == room.id)
                .then(|| sensor_of(d, record))
        })
    }

    /// Sensors in every room named `room_id`, across all floors and buildings.
    pub async fn sensors_of_room_id(&self, room_id: &str, filter: Option<&[String]>) -> Result<Vec<Sensor>> {
        let records = self.cache.fetch().await?;
        resolve_level(&records, filter, |d, record| {
            (d.room_id == room_id).then(|| sensor_of(d, record))
        })
    }

    /// The whole hierarchy in one pass.
    pub async fn tree(&self) -> Result<Vec<BuildingNode>> {
        let records = self.cache.fetch().await?;
        build_tree(&records)
    }
}

fn build_tree(records: &[MetadataRecord]) -> Result<Vec<BuildingNode>> {
    let mut buildings: Vec<BuildingNode> = Vec::new();
    let mut building_index: HashMap<String, usize> = HashMap::new();
    let mut floor_index: HashMap<(String, String), usize> = HashMap::new();
    let mut room_index: HashMap<(String, String, String), usize> = HashMap::new();
    let mut seen_sensors: HashSet<(String, String)> = HashSet::new();

    for record in records {
        let d = decode(&record.source)?;

        let b = *building_index.entry(d.building_id.clone()).or_insert_with(|| {
            buildings.push(BuildingNode {
                building: building_of(&d),
                floors: Vec::new(),
            });
            buildings.len() - 1
        });
        let floors = &mut buildings[b].floors;

        let floor_key = (d.building_id.clone(), d.floor_id.clone());
        let f = *floor_index.entry(floor_key).or_insert_with(|| {
            floors.push(FloorNode {
                floor: floor_of(&d),
                rooms: Vec::new(),
            });
            floors.len() - 1
        });
        let rooms = &mut floors[f].rooms;

        let room_key = (d.building_id.clone(), d.floor_id.clone(), d.room_id.clone());
        let r = *room_index.entry(room_key).or_insert_with(|| {
            rooms.push(RoomNode {
                room: room_of(&d),
                sensors: Vec::new(),
            });
            rooms.len() - 1
        });

        let sensor = sensor_of(&d, record);
        if seen_sensors.insert(sensor.key()) {
            rooms[r].sensors.push(sensor);
        }
    }

    Ok(buildings)
}
