use super::crud;
use super::model::RecordSnapshot;
use super::schema::{
    GetSnapshotResponse, OracleSnapshotView, RecordSnapshotRequest, RecordSnapshotResponse,
};
use crate::app::AppState;
use crate::module::error::AppError;
use crate::service::validation_service::{caller_identity, parse_hex_field, verify_write_auth};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use tracing::error;

pub async fn record_snapshot(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RecordSnapshotRequest>,
) -> impl IntoResponse {
    if let Err(err) = verify_write_auth(&state, &headers, &req) {
        return error_record(err);
    }
    let parsed = caller_identity(&headers).and_then(|caller| {
        Ok((
            caller,
            RecordSnapshot {
                oracle_program: parse_hex_field("oracle_program", &req.oracle_program)?,
                feed: parse_hex_field("feed", &req.feed)?,
                price_e9: req.price_e9,
                conf_e9: req.conf_e9,
                observed_slot: req.observed_slot,
            },
        ))
    });
    let (caller, record) = match parsed {
        Ok(v) => v,
        Err(err) => return error_record(err),
    };

    match crud::record_snapshot(&state, caller, record) {
        Ok(recorded) => (
            StatusCode::OK,
            Json(RecordSnapshotResponse {
                recorded: true,
                idempotent: recorded.idempotent,
                snapshot: Some(OracleSnapshotView::from_record(&recorded.snapshot)),
                error_code: None,
                reason: if recorded.idempotent {
                    "snapshot already recorded".to_string()
                } else {
                    "snapshot recorded".to_string()
                },
            }),
        ),
        Err(err) => error_record(err.into()),
    }
}

pub async fn get_snapshot(
    State(state): State<AppState>,
    Path(snapshot_address): Path<String>,
) -> impl IntoResponse {
    let address = match parse_hex_field("snapshot_address", &snapshot_address) {
        Ok(v) => v,
        Err(err) => return error_get(err),
    };
    match crud::get_snapshot(&state, &address) {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(GetSnapshotResponse {
                found: true,
                snapshot: Some(OracleSnapshotView::from_record(&snapshot)),
                error_code: None,
                reason: "snapshot found".to_string(),
            }),
        ),
        Err(err) => error_get(err.into()),
    }
}

fn error_record(err: AppError) -> (StatusCode, Json<RecordSnapshotResponse>) {
    error!(error_code = err.code, reason = %err.message, "oracle snapshot rejected");
    (
        err.status,
        Json(RecordSnapshotResponse {
            recorded: false,
            idempotent: false,
            snapshot: None,
            error_code: Some(err.code.to_string()),
            reason: err.message,
        }),
    )
}

fn error_get(err: AppError) -> (StatusCode, Json<GetSnapshotResponse>) {
    error!(error_code = err.code, reason = %err.message, "oracle snapshot lookup failed");
    (
        err.status,
        Json(GetSnapshotResponse {
            found: false,
            snapshot: None,
            error_code: Some(err.code.to_string()),
            reason: err.message,
        }),
    )
}
