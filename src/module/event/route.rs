use super::controller;
use crate::app::AppState;
use axum::Router;
use axum::routing::get;

pub fn register_routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/events", get(controller::list_events))
        .route("/v1/health", get(controller::health))
        .with_state(state)
}
