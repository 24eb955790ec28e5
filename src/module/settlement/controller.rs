use super::crud;
use super::model::SettlementParams;
use super::schema::{
    ConsumptionView, ExecuteSettlementRequest, ExecuteSettlementResponse, GetConsumptionResponse,
    VaultPositionResponse,
};
use crate::app::AppState;
use crate::module::error::AppError;
use crate::service::validation_service::{
    caller_identity, parse_hex_field, parse_optional_hex_field, verify_write_auth,
};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use tracing::error;

pub async fn execute_settlement(
    State(state): State<AppState>,
    Path(job_address): Path<String>,
    headers: HeaderMap,
    Json(req): Json<ExecuteSettlementRequest>,
) -> impl IntoResponse {
    if let Err(err) = verify_write_auth(&state, &headers, &req) {
        return error_execute(err);
    }
    let parsed = caller_identity(&headers).and_then(|caller| {
        let address = parse_hex_field("job_address", &job_address)?;
        Ok((caller, address, to_params(&req)?))
    });
    let (caller, address, params) = match parsed {
        Ok(v) => v,
        Err(err) => return error_execute(err),
    };

    match crud::execute_settlement(&state, caller, address, params) {
        Ok(outcome) => (
            StatusCode::OK,
            Json(ExecuteSettlementResponse {
                executed: true,
                consumption: Some(ConsumptionView::from_record(&outcome.consumption)),
                position: Some(outcome.position),
                error_code: None,
                reason: "settlement executed".to_string(),
            }),
        ),
        Err(err) => error_execute(err.into()),
    }
}

pub async fn get_consumption(
    State(state): State<AppState>,
    Path(job_address): Path<String>,
) -> impl IntoResponse {
    let address = match parse_hex_field("job_address", &job_address) {
        Ok(v) => v,
        Err(err) => return error_consumption(err),
    };
    match crud::get_consumption(&state, &address) {
        Ok(record) => (
            StatusCode::OK,
            Json(GetConsumptionResponse {
                found: true,
                consumed: record.is_some(),
                reason: if record.is_some() {
                    "job consumed".to_string()
                } else {
                    "job not consumed".to_string()
                },
                consumption: record.as_ref().map(ConsumptionView::from_record),
                error_code: None,
            }),
        ),
        Err(err) => error_consumption(err.into()),
    }
}

pub async fn get_vault_position(
    State(state): State<AppState>,
    Path((asset, user)): Path<(String, String)>,
) -> impl IntoResponse {
    let parsed = parse_hex_field("asset", &asset)
        .and_then(|a| Ok((a, parse_hex_field("user", &user)?)))
        .and_then(|(a, u)| Ok(crud::get_vault_position(&state, &a, &u)?));
    match parsed {
        Ok(position) => (
            StatusCode::OK,
            Json(VaultPositionResponse {
                asset,
                user,
                position: Some(position),
                error_code: None,
                reason: "position found".to_string(),
            }),
        ),
        Err(err) => {
            error!(error_code = err.code, reason = %err.message, "vault position lookup failed");
            (
                err.status,
                Json(VaultPositionResponse {
                    asset,
                    user,
                    position: None,
                    error_code: Some(err.code.to_string()),
                    reason: err.message,
                }),
            )
        }
    }
}

fn to_params(req: &ExecuteSettlementRequest) -> Result<SettlementParams, AppError> {
    Ok(SettlementParams {
        effect: req.effect,
        user: parse_hex_field("user", &req.user)?,
        asset: parse_hex_field("asset", &req.asset)?,
        amount: req.amount,
        nonce: req.nonce,
        conf_band_bp: req.conf_band_bp,
        staleness_limit_slots: req.staleness_limit_slots,
        snapshot: parse_optional_hex_field("snapshot_address", req.snapshot_address.as_deref())?,
    })
}

fn error_execute(err: AppError) -> (StatusCode, Json<ExecuteSettlementResponse>) {
    error!(error_code = err.code, reason = %err.message, "settlement rejected");
    (
        err.status,
        Json(ExecuteSettlementResponse {
            executed: false,
            consumption: None,
            position: None,
            error_code: Some(err.code.to_string()),
            reason: err.message,
        }),
    )
}

fn error_consumption(err: AppError) -> (StatusCode, Json<GetConsumptionResponse>) {
    error!(error_code = err.code, reason = %err.message, "consumption lookup failed");
    (
        err.status,
        Json(GetConsumptionResponse {
            found: false,
            consumed: false,
            consumption: None,
            error_code: Some(err.code.to_string()),
            reason: err.message,
        }),
    )
}
