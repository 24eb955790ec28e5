use super::controller;
use crate::app::AppState;
use axum::Router;
use axum::routing::{get, post};

pub fn register_routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/jobs", post(controller::submit_job))
        .route("/v1/jobs/:job_address", get(controller::get_job))
        .route("/v1/jobs/:job_address/result", post(controller::post_result))
        .route(
            "/v1/jobs/:job_address/finalize",
            post(controller::finalize_job),
        )
        .with_state(state)
}
