//! Application router configuration.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::types::ServerState;

/// Create the application router with a specific state.
pub fn create_router_with_state(state: ServerState) -> Router {
    use crate::handlers::{basic, doorcounters, hierarchy, sensors};

    let health_routes = Router::new()
        .route("/api/health", get(basic::health_handler))
        .route("/api/health/status", get(basic::health_status_handler));

    let bms_routes = Router::new()
        .route("/api/buildings", get(hierarchy::list_buildings_handler))
        .route(
            "/api/buildings/:building/floors",
            get(hierarchy::list_floors_handler),
        )
        .route(
            "/api/buildings/:building/floors/:floor/rooms",
            get(hierarchy::list_rooms_handler),
        )
        .route(
            "/api/buildings/:building/floors/:floor/rooms/:room/sensors",
            get(hierarchy::list_sensors_handler),
        )
        .route("/api/sensors/:id/values", get(sensors::sensor_values_handler))
        .route("/api/tree", get(hierarchy::tree_handler))
        .route("/api/metadata/refresh", post(hierarchy::refresh_metadata_handler));

    let door_routes = Router::new()
        .route(
            "/api/doorcounters/entrances",
            get(doorcounters::list_entrances_handler),
        )
        .route(
            "/api/doorcounters/entrances/:id",
            get(doorcounters::get_entrance_handler),
        )
        .route("/api/doorcounters/counts", get(doorcounters::door_counts_handler));

    health_routes
        .merge(bms_routes)
        .merge(door_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
