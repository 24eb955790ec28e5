use crate::service::ir_service::{FunctionId, FunctionKind, IrParams};
use crate::{Hash32, Identity};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Submitted,
    Posted,
    Finalized,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "SUBMITTED",
            Self::Posted => "POSTED",
            Self::Finalized => "FINALIZED",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusTransition {
    pub from_status: Option<JobStatus>,
    pub to_status: JobStatus,
    pub slot: u64,
    pub transitioned_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedResult {
    pub result_commitment: Hash32,
    pub expected_code_digest: Hash32,
    pub external_ptr_hash: Option<Hash32>,
    pub posted_slot: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub address: Hash32,
    pub commitment: Hash32,
    pub submitter: Identity,
    pub kind: FunctionKind,
    pub context_data: Hash32,
    pub da_ptr_hash: Option<Hash32>,
    pub reveal_after_slot: u64,
    pub submitted_ir_digest: Option<Hash32>,
    pub status: JobStatus,
    pub result: Option<PostedResult>,
    pub submitted_slot: u64,
    pub finalized_slot: Option<u64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub transitions: Vec<JobStatusTransition>,
}

impl JobRecord {
    pub fn function_id(&self) -> FunctionId {
        self.kind.function_id()
    }

    pub fn expected_code_digest(&self) -> Option<Hash32> {
        self.result.as_ref().map(|r| r.expected_code_digest)
    }

    pub fn result_commitment(&self) -> Option<Hash32> {
        self.result.as_ref().map(|r| r.result_commitment)
    }

    pub fn external_ptr_hash(&self) -> Option<Hash32> {
        self.result.as_ref().and_then(|r| r.external_ptr_hash)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrSource {
    Inline(Vec<u8>),
    Reference(IrParams),
}

#[derive(Debug, Clone)]
pub struct SubmitJob {
    pub commitment: Hash32,
    pub da_ptr_hash: Option<Hash32>,
    pub reveal_after_slot: u64,
    pub function_id: u16,
    pub context_data: Hash32,
    pub ir: IrSource,
}

#[derive(Debug, Clone)]
pub struct PostResult {
    pub result_commitment: Hash32,
    pub code_digest: Hash32,
    pub external_ptr_hash: Option<Hash32>,
    pub snapshot: Option<Hash32>,
}
