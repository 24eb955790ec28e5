use super::model::{JobRecord, JobStatus, JobStatusTransition};
use crate::service::hash_service::to_hex;
use crate::service::ir_service::{FunctionKind, IrParams};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitJobRequest {
    pub commitment: String,
    #[serde(default, alias = "daPtrHash")]
    pub da_ptr_hash: Option<String>,
    #[serde(default, alias = "revealAfterSlot")]
    pub reveal_after_slot: u64,
    #[serde(alias = "functionId")]
    pub function_id: u16,
    #[serde(alias = "contextData")]
    pub context_data: String,
    #[serde(default)]
    pub ir: Option<String>,
    #[serde(default, alias = "irParams")]
    pub ir_params: Option<IrParams>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResultRequest {
    #[serde(alias = "resultCommitment")]
    pub result_commitment: String,
    #[serde(alias = "codeDigest")]
    pub code_digest: String,
    #[serde(default, alias = "externalPtrHash")]
    pub external_ptr_hash: Option<String>,
    #[serde(default, alias = "snapshotAddress")]
    pub snapshot_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobView {
    pub address: String,
    pub commitment: String,
    pub submitter: String,
    pub function_id: u16,
    pub function: String,
    pub kind: FunctionKind,
    pub context_data: String,
    pub da_ptr_hash: Option<String>,
    pub reveal_after_slot: u64,
    pub submitted_ir_digest: Option<String>,
    pub status: JobStatus,
    pub expected_code_digest: Option<String>,
    pub result_commitment: Option<String>,
    pub external_ptr_hash: Option<String>,
    pub submitted_slot: u64,
    pub posted_slot: Option<u64>,
    pub finalized_slot: Option<u64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub transitions: Vec<JobStatusTransition>,
}

impl JobView {
    pub fn from_record(job: &JobRecord) -> Self {
        let function_id = job.function_id();
        Self {
            address: to_hex(&job.address),
            commitment: to_hex(&job.commitment),
            submitter: to_hex(&job.submitter),
            function_id: function_id.code(),
            function: function_id.as_str().to_string(),
            kind: job.kind,
            context_data: to_hex(&job.context_data),
            da_ptr_hash: job.da_ptr_hash.as_ref().map(to_hex),
            reveal_after_slot: job.reveal_after_slot,
            submitted_ir_digest: job.submitted_ir_digest.as_ref().map(to_hex),
            status: job.status,
            expected_code_digest: job.expected_code_digest().as_ref().map(to_hex),
            result_commitment: job.result_commitment().as_ref().map(to_hex),
            external_ptr_hash: job.external_ptr_hash().as_ref().map(to_hex),
            submitted_slot: job.submitted_slot,
            posted_slot: job.result.as_ref().map(|r| r.posted_slot),
            finalized_slot: job.finalized_slot,
            created_at: job.created_at,
            updated_at: job.updated_at,
            transitions: job.transitions.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitJobResponse {
    pub accepted: bool,
    pub job_address: String,
    pub job: Option<JobView>,
    pub retryable: bool,
    pub error_code: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateJobResponse {
    pub updated: bool,
    pub job: Option<JobView>,
    pub error_code: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetJobResponse {
    pub found: bool,
    pub job: Option<JobView>,
    pub error_code: Option<String>,
    pub reason: String,
}
