//! Door-counter handlers.

use axum::extract::{Path, Query, State};
use buildlink_doorcounters::{entrance, entrances, DoorCount, Entrance};

use super::common::{ok, HandlerResult, TimeRangeQuery};
use super::ServerState;
use crate::models::ErrorResponse;

/// GET /api/doorcounters/entrances
pub async fn list_entrances_handler() -> HandlerResult<Vec<Entrance>> {
    ok(entrances())
}

/// GET /api/doorcounters/entrances/:id
pub async fn get_entrance_handler(Path(id): Path<String>) -> HandlerResult<Entrance> {
    let entrance = entrance(&id).ok_or_else(|| ErrorResponse::not_found(format!("Entrance {}", id)))?;
    ok(entrance)
}

/// Merged door counts.
///
/// GET /api/doorcounters/counts?start=..&end=..
pub async fn door_counts_handler(
    State(state): State<ServerState>,
    Query(query): Query<TimeRangeQuery>,
) -> HandlerResult<Vec<DoorCount>> {
    let (start, end) = query.parse()?;
    let counts = state.doors.counts(start, end).await?;
    ok(counts)
}
