use super::crud;
use super::model::{IrSource, PostResult, SubmitJob};
use super::schema::{
    GetJobResponse, JobView, PostResultRequest, SubmitJobRequest, SubmitJobResponse,
    UpdateJobResponse,
};
use crate::app::AppState;
use crate::module::error::AppError;
use crate::service::hash_service::to_hex;
use crate::service::validation_service::{
    caller_identity, parse_hex_field, parse_ir_bytes, parse_optional_hex_field, verify_write_auth,
};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde_json::json;
use tracing::{error, info};

pub async fn submit_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SubmitJobRequest>,
) -> impl IntoResponse {
    if let Err(err) = verify_write_auth(&state, &headers, &req) {
        return error_submit(err, false);
    }
    let submitter = match caller_identity(&headers) {
        Ok(v) => v,
        Err(err) => return error_submit(err, false),
    };
    let submit = match to_submit_job(req) {
        Ok(v) => v,
        Err(err) => return error_submit(err, false),
    };

    match crud::submit_job(&state, submitter, submit) {
        Ok(job) => {
            let job_address = to_hex(&job.address);
            info!(job = %job_address, "job accepted");
            (
                StatusCode::OK,
                Json(SubmitJobResponse {
                    accepted: true,
                    job_address,
                    job: Some(JobView::from_record(&job)),
                    retryable: false,
                    error_code: None,
                    reason: "job submitted".to_string(),
                }),
            )
        }
        Err(err) => {
            let retryable = err.is_retryable();
            error_submit(err.into(), retryable)
        }
    }
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(job_address): Path<String>,
) -> impl IntoResponse {
    let address = match parse_hex_field("job_address", &job_address) {
        Ok(v) => v,
        Err(err) => return error_get(err),
    };
    match crud::get_job(&state, &address) {
        Ok(job) => (
            StatusCode::OK,
            Json(GetJobResponse {
                found: true,
                job: Some(JobView::from_record(&job)),
                error_code: None,
                reason: "job found".to_string(),
            }),
        ),
        Err(err) => error_get(err.into()),
    }
}

pub async fn post_result(
    State(state): State<AppState>,
    Path(job_address): Path<String>,
    headers: HeaderMap,
    Json(req): Json<PostResultRequest>,
) -> impl IntoResponse {
    if let Err(err) = verify_write_auth(&state, &headers, &req) {
        return error_update(err, "post result rejected");
    }
    let parsed = caller_identity(&headers).and_then(|caller| {
        let address = parse_hex_field("job_address", &job_address)?;
        Ok((caller, address, to_post_result(&req)?))
    });
    let (caller, address, post) = match parsed {
        Ok(v) => v,
        Err(err) => return error_update(err, "post result rejected"),
    };

    match crud::post_result(&state, caller, address, post) {
        Ok(job) => updated(&job, "result posted"),
        Err(err) => error_update(err.into(), "post result rejected"),
    }
}

pub async fn finalize_job(
    State(state): State<AppState>,
    Path(job_address): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Err(err) = verify_write_auth(&state, &headers, &json!({ "job_address": job_address })) {
        return error_update(err, "finalize rejected");
    }
    let address = match parse_hex_field("job_address", &job_address) {
        Ok(v) => v,
        Err(err) => return error_update(err, "finalize rejected"),
    };

    match crud::finalize(&state, address) {
        Ok(job) => updated(&job, "job finalized"),
        Err(err) => error_update(err.into(), "finalize rejected"),
    }
}

fn to_submit_job(req: SubmitJobRequest) -> Result<SubmitJob, AppError> {
    let ir = match req.ir.as_deref() {
        Some(raw) => IrSource::Inline(parse_ir_bytes(raw)?),
        None => IrSource::Reference(req.ir_params.unwrap_or_default()),
    };
    Ok(SubmitJob {
        commitment: parse_hex_field("commitment", &req.commitment)?,
        da_ptr_hash: parse_optional_hex_field("da_ptr_hash", req.da_ptr_hash.as_deref())?,
        reveal_after_slot: req.reveal_after_slot,
        function_id: req.function_id,
        context_data: parse_hex_field("context_data", &req.context_data)?,
        ir,
    })
}

fn to_post_result(req: &PostResultRequest) -> Result<PostResult, AppError> {
    Ok(PostResult {
        result_commitment: parse_hex_field("result_commitment", &req.result_commitment)?,
        code_digest: parse_hex_field("code_digest", &req.code_digest)?,
        external_ptr_hash: parse_optional_hex_field(
            "external_ptr_hash",
            req.external_ptr_hash.as_deref(),
        )?,
        snapshot: parse_optional_hex_field("snapshot_address", req.snapshot_address.as_deref())?,
    })
}

fn updated(
    job: &super::model::JobRecord,
    reason: &str,
) -> (StatusCode, Json<UpdateJobResponse>) {
    info!(job = %to_hex(&job.address), status = %job.status, "{reason}");
    (
        StatusCode::OK,
        Json(UpdateJobResponse {
            updated: true,
            job: Some(JobView::from_record(job)),
            error_code: None,
            reason: reason.to_string(),
        }),
    )
}

fn error_submit(err: AppError, retryable: bool) -> (StatusCode, Json<SubmitJobResponse>) {
    error!(error_code = err.code, reason = %err.message, "job submit rejected");
    (
        err.status,
        Json(SubmitJobResponse {
            accepted: false,
            job_address: String::new(),
            job: None,
            retryable,
            error_code: Some(err.code.to_string()),
            reason: err.message,
        }),
    )
}

fn error_get(err: AppError) -> (StatusCode, Json<GetJobResponse>) {
    error!(error_code = err.code, reason = %err.message, "job lookup failed");
    (
        err.status,
        Json(GetJobResponse {
            found: false,
            job: None,
            error_code: Some(err.code.to_string()),
            reason: err.message,
        }),
    )
}

fn error_update(err: AppError, context: &str) -> (StatusCode, Json<UpdateJobResponse>) {
    error!(error_code = err.code, reason = %err.message, "{context}");
    (
        err.status,
        Json(UpdateJobResponse {
            updated: false,
            job: None,
            error_code: Some(err.code.to_string()),
            reason: err.message,
        }),
    )
}
