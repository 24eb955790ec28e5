use super::model::{
    IrSource, JobRecord, JobStatus, JobStatusTransition, PostResult, PostedResult, SubmitJob,
};
use crate::app::AppState;
use crate::error::ProtocolError;
use crate::infra::lock_store;
use crate::module::event::model::ProtocolEvent;
use crate::service::hash_service::{code_digest, job_address, to_hex};
use crate::service::ir_service::{FunctionId, FunctionKind, decode_ir};
use crate::service::metrics_service;
use crate::{Hash32, Identity};
use chrono::Utc;
use tracing::{error, info};

pub fn submit_job(
    state: &AppState,
    submitter: Identity,
    req: SubmitJob,
) -> Result<JobRecord, ProtocolError> {
    let function_id = FunctionId::try_from(req.function_id)?;
    let (kind, submitted_ir_digest) = match &req.ir {
        IrSource::Inline(bytes) => {
            if bytes.len() > state.config.max_ir_bytes {
                return Err(ProtocolError::IrTooLarge {
                    len: bytes.len(),
                    max: state.config.max_ir_bytes,
                });
            }
            (decode_ir(function_id, bytes)?, Some(code_digest(bytes)))
        }
        IrSource::Reference(params) => (FunctionKind::from_params(function_id, params), None),
    };

    let address = job_address(&req.commitment, &submitter);
    let slot = state.current_slot();
    let now = Utc::now().timestamp();

    let mut inner = lock_store(&state.store)?;
    if inner.jobs.contains_key(&address) {
        return Err(ProtocolError::DuplicateCommitment);
    }

    let job = JobRecord {
        address,
        commitment: req.commitment,
        submitter,
        kind,
        context_data: req.context_data,
        da_ptr_hash: req.da_ptr_hash,
        reveal_after_slot: req.reveal_after_slot,
        submitted_ir_digest,
        status: JobStatus::Submitted,
        result: None,
        submitted_slot: slot,
        finalized_slot: None,
        created_at: now,
        updated_at: now,
        transitions: vec![JobStatusTransition {
            from_status: None,
            to_status: JobStatus::Submitted,
            slot,
            transitioned_at: now,
        }],
    };
    inner.jobs.insert(address, job.clone());
    inner.emit(
        slot,
        ProtocolEvent::JobSubmitted {
            job: to_hex(&address),
            submitter: to_hex(&submitter),
            commitment: to_hex(&job.commitment),
            da_ptr_hash: job.da_ptr_hash.as_ref().map(to_hex),
            function_id: function_id.code(),
            context_data: to_hex(&job.context_data),
        },
    );
    drop(inner);

    metrics_service::inc_jobs_submitted();
    info!(job = %to_hex(&address), function = function_id.as_str(), "job submitted");
    Ok(job)
}

pub fn post_result(
    state: &AppState,
    caller: Identity,
    address: Hash32,
    req: PostResult,
) -> Result<JobRecord, ProtocolError> {
    if caller != state.config.executor {
        return Err(ProtocolError::Unauthorized { role: "executor" });
    }

    let slot = state.current_slot();
    let mut inner = lock_store(&state.store)?;
    let job = inner.jobs.get(&address).ok_or(ProtocolError::JobNotFound)?;
    if job.status != JobStatus::Submitted {
        return Err(ProtocolError::InvalidState {
            expected: JobStatus::Submitted,
            actual: job.status,
        });
    }

    // A pointer hash is only ever stored together with the snapshot it was
    // checked against. Unpriced jobs may still bind one voluntarily.
    let binding = match (req.external_ptr_hash, req.snapshot) {
        (Some(ptr), Some(snapshot)) => Some((ptr, snapshot)),
        (Some(_), None) => return Err(ProtocolError::MissingSnapshot),
        (None, _) => None,
    };
    if job.kind.is_oracle_bound() && binding.is_none() {
        return Err(ProtocolError::MissingSnapshot);
    }
    if let Some((ptr, snapshot)) = binding {
        let recorded = inner
            .snapshots
            .get(&snapshot)
            .ok_or(ProtocolError::MissingSnapshot)?;
        if recorded.recompute_ptr_hash() != ptr {
            return Err(violation(ProtocolError::SnapshotMismatch, &address));
        }
    }

    let expected = job.kind.code_digest();
    if req.code_digest != expected {
        return Err(violation(ProtocolError::CodeDigestMismatch, &address));
    }

    let now = Utc::now().timestamp();
    let job = inner
        .jobs
        .get_mut(&address)
        .ok_or(ProtocolError::JobNotFound)?;
    job.result = Some(PostedResult {
        result_commitment: req.result_commitment,
        expected_code_digest: expected,
        external_ptr_hash: req.external_ptr_hash,
        posted_slot: slot,
    });
    transition(job, JobStatus::Posted, slot, now);
    let job = job.clone();
    inner.emit(
        slot,
        ProtocolEvent::JobPosted {
            job: to_hex(&address),
            result_commitment: to_hex(&req.result_commitment),
            code_digest: to_hex(&expected),
            external_ptr_hash: req.external_ptr_hash.as_ref().map(to_hex),
        },
    );
    drop(inner);

    metrics_service::inc_results_posted();
    info!(job = %to_hex(&address), slot, "result posted");
    Ok(job)
}

pub fn finalize(state: &AppState, address: Hash32) -> Result<JobRecord, ProtocolError> {
    let slot = state.current_slot();
    let mut inner = lock_store(&state.store)?;
    let job = inner
        .jobs
        .get_mut(&address)
        .ok_or(ProtocolError::JobNotFound)?;
    if job.status != JobStatus::Posted {
        return Err(ProtocolError::InvalidState {
            expected: JobStatus::Posted,
            actual: job.status,
        });
    }

    transition(job, JobStatus::Finalized, slot, Utc::now().timestamp());
    job.finalized_slot = Some(slot);
    let job = job.clone();
    inner.emit(
        slot,
        ProtocolEvent::JobFinalized {
            job: to_hex(&address),
        },
    );
    drop(inner);

    metrics_service::inc_jobs_finalized();
    info!(job = %to_hex(&address), slot, "job finalized");
    Ok(job)
}

pub fn get_job(state: &AppState, address: &Hash32) -> Result<JobRecord, ProtocolError> {
    let inner = lock_store(&state.store)?;
    inner
        .jobs
        .get(address)
        .cloned()
        .ok_or(ProtocolError::JobNotFound)
}

fn transition(job: &mut JobRecord, to: JobStatus, slot: u64, now: i64) {
    job.transitions.push(JobStatusTransition {
        from_status: Some(job.status),
        to_status: to,
        slot,
        transitioned_at: now,
    });
    job.status = to;
    job.updated_at = now;
}

fn violation(err: ProtocolError, address: &Hash32) -> ProtocolError {
    metrics_service::inc_correctness_violations();
    metrics_service::set_last_error_ts(Utc::now().timestamp());
    error!(job = %to_hex(address), error_code = err.code(), "correctness violation on post result");
    err
}
