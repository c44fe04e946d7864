//! Sensor trend-data handler.

use axum::extract::{Path, Query, State};
use buildlink_bms::TimeSeriesPoint;

use super::common::{ok, HandlerResult, TimeRangeQuery};
use super::ServerState;

/// Trend values of one sensor.
///
/// GET /api/sensors/:id/values?start=2025-03-01T00:00:00Z&end=2025-03-02T00:00:00Z
pub async fn sensor_values_handler(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<TimeRangeQuery>,
) -> HandlerResult<Vec<TimeSeriesPoint>> {
    let (start, end) = query.parse()?;
    let points = state.bms.values.values(&id, start, end).await?;
    ok(points)
}
