use super::controller;
use crate::app::AppState;
use axum::Router;
use axum::routing::{get, post};

pub fn register_routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/oracle-snapshots", post(controller::record_snapshot))
        .route(
            "/v1/oracle-snapshots/:snapshot_address",
            get(controller::get_snapshot),
        )
        .with_state(state)
}
