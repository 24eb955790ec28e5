use super::crud;
use super::schema::{HealthMetricsView, HealthResponse, ListEventsQuery, ListEventsResponse};
use crate::app::AppState;
use crate::module::error::AppError;
use crate::service::metrics_service;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::error;

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> impl IntoResponse {
    match crud::list_events(&state, query.since) {
        Ok(events) => (
            StatusCode::OK,
            Json(ListEventsResponse {
                reason: format!("{} events", events.len()),
                events,
                error_code: None,
            }),
        ),
        Err(err) => {
            let err = AppError::from(err);
            error!(error_code = err.code, reason = %err.message, "event listing failed");
            (
                err.status,
                Json(ListEventsResponse {
                    events: Vec::new(),
                    error_code: Some(err.code.to_string()),
                    reason: err.message,
                }),
            )
        }
    }
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let m = metrics_service::snapshot();
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "confidential-coprocessor".to_string(),
        env: state.config.rust_env.clone(),
        current_slot: state.current_slot(),
        metrics: HealthMetricsView {
            jobs_submitted: m.jobs_submitted,
            results_posted: m.results_posted,
            jobs_finalized: m.jobs_finalized,
            snapshots_recorded: m.snapshots_recorded,
            settlements_executed: m.settlements_executed,
            replays_rejected: m.replays_rejected,
            correctness_violations: m.correctness_violations,
            last_error_ts: m.last_error_ts,
        },
    })
}
