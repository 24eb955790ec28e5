use super::controller;
use crate::app::AppState;
use axum::Router;
use axum::routing::{get, post};

pub fn register_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/settlements/:job_address",
            post(controller::execute_settlement).get(controller::get_consumption),
        )
        .route(
            "/v1/vaults/:asset/:user",
            get(controller::get_vault_position),
        )
        .with_state(state)
}
