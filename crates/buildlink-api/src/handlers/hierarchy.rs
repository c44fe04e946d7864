//! Building hierarchy handlers.

use axum::extract::{Path, Query, State};
use buildlink_bms::{Building, BuildingNode, Floor, Room, Sensor};
use serde_json::json;
use tracing::info;

use super::common::{ok, HandlerResult, IdsQuery};
use super::ServerState;

/// List buildings.
///
/// GET /api/buildings?ids=B1,B2
pub async fn list_buildings_handler(
    State(state): State<ServerState>,
    Query(query): Query<IdsQuery>,
) -> HandlerResult<Vec<Building>> {
    let ids = query.ids();
    let buildings = state.bms.index.buildings(Some(ids.as_slice())).await?;
    ok(buildings)
}

/// List floors of a building.
///
/// GET /api/buildings/:building/floors
pub async fn list_floors_handler(
    State(state): State<ServerState>,
    Path(building): Path<String>,
    Query(query): Query<IdsQuery>,
) -> HandlerResult<Vec<Floor>> {
    let ids = query.ids();
    let floors = state.bms.index.floors(&building, Some(ids.as_slice())).await?;
    ok(floors)
}

/// List rooms of a floor.
///
/// GET /api/buildings/:building/floors/:floor/rooms
pub async fn list_rooms_handler(
    State(state): State<ServerState>,
    Path((building, floor)): Path<(String, String)>,
    Query(query): Query<IdsQuery>,
) -> HandlerResult<Vec<Room>> {
    let floor = Floor {
        id: floor,
        building_id: building,
    };
    let ids = query.ids();
    let rooms = state.bms.index.rooms(&floor, Some(ids.as_slice())).await?;
    ok(rooms)
}

/// List sensors of a room.
///
/// GET /api/buildings/:building/floors/:floor/rooms/:room/sensors
pub async fn list_sensors_handler(
    State(state): State<ServerState>,
    Path((building, floor, room)): Path<(String, String, String)>,
    Query(query): Query<IdsQuery>,
) -> HandlerResult<Vec<Sensor>> {
    let room = Room {
        id: room,
        floor_id: floor,
        building_id: building,
    };
    let ids = query.ids();
    let sensors = state.bms.index.sensors(&room, Some(ids.as_slice())).await?;
    ok(sensors)
}

/// Whole hierarchy.
///
/// GET /api/tree
pub async fn tree_handler(State(state): State<ServerState>) -> HandlerResult<Vec<BuildingNode>> {
    ok(state.bms.index.tree().await?)
}

/// Drop the cached sensor list.
///
/// POST /api/metadata/refresh
pub async fn refresh_metadata_handler(
    State(state): State<ServerState>,
) -> HandlerResult<serde_json::Value> {
    let was_cached = state.bms.cache.is_populated();
    state.bms.cache.invalidate();
    info!(was_cached, "Metadata refresh requested");
    ok(json!({ "invalidated": was_cached }))
}
