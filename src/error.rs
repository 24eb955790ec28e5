use crate::module::job::model::JobStatus;
use crate::service::ir_service::{FunctionId, IrError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EffectError {
    #[error("effect expects a {expected} job, got {actual}")]
    BadFunction {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("caller is not the job submitter")]
    NotJobSubmitter,

    #[error("context data does not match the settlement parameters")]
    BadContextData,

    #[error("insufficient vault balance: available={available}, requested={requested}")]
    InsufficientVaultBalance { available: u64, requested: u64 },

    #[error("oracle snapshot too stale: observed_slot={observed_slot}, current_slot={current_slot}, limit={limit}")]
    OracleStale {
        observed_slot: u64,
        current_slot: u64,
        limit: u64,
    },

    #[error("oracle-bound effect requires a snapshot")]
    MissingSnapshot,

    #[error("vault arithmetic overflow")]
    Overflow,
}

impl EffectError {
    pub fn bad_function(expected: FunctionId, actual: FunctionId) -> Self {
        Self::BadFunction {
            expected: expected.as_str(),
            actual: actual.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("a job already exists for this commitment and submitter")]
    DuplicateCommitment,

    #[error("caller is not the configured {role}")]
    Unauthorized { role: &'static str },

    #[error("job is {actual}, expected {expected}")]
    InvalidState {
        expected: JobStatus,
        actual: JobStatus,
    },

    #[error("oracle-bound job requires an external pointer hash and a recorded snapshot")]
    MissingSnapshot,

    #[error("external pointer hash does not match the recorded snapshot")]
    SnapshotMismatch,

    #[error("code digest does not match the canonical digest for the function")]
    CodeDigestMismatch,

    #[error("snapshot differs from the one bound when the result was posted")]
    WrongSnapshot,

    #[error("job settlement already consumed")]
    JobAlreadyConsumed,

    #[error("job not found")]
    JobNotFound,

    #[error("oracle snapshot not found")]
    SnapshotNotFound,

    #[error("oracle snapshot already recorded with different data")]
    SnapshotConflict,

    #[error("unknown function id {0}")]
    UnknownFunctionId(u16),

    #[error("invalid ir: {0}")]
    InvalidIr(String),

    #[error("ir too large: {len} bytes exceeds {max}")]
    IrTooLarge { len: usize, max: usize },

    #[error("settlement rejected: {0}")]
    SettlementRejected(#[from] EffectError),

    #[error("protocol store unavailable")]
    StoreUnavailable,
}

impl ProtocolError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateCommitment => "DUPLICATE_COMMITMENT",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::MissingSnapshot => "MISSING_SNAPSHOT",
            Self::SnapshotMismatch => "SNAPSHOT_MISMATCH",
            Self::CodeDigestMismatch => "CODE_DIGEST_MISMATCH",
            Self::WrongSnapshot => "WRONG_SNAPSHOT",
            Self::JobAlreadyConsumed => "JOB_ALREADY_CONSUMED",
            Self::JobNotFound => "JOB_NOT_FOUND",
            Self::SnapshotNotFound => "SNAPSHOT_NOT_FOUND",
            Self::SnapshotConflict => "SNAPSHOT_CONFLICT",
            Self::UnknownFunctionId(_) => "UNKNOWN_FUNCTION_ID",
            Self::InvalidIr(_) => "INVALID_IR",
            Self::IrTooLarge { .. } => "IR_TOO_LARGE",
            Self::SettlementRejected(_) => "SETTLEMENT_REJECTED",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DuplicateCommitment)
    }

    pub fn is_correctness_violation(&self) -> bool {
        matches!(
            self,
            Self::CodeDigestMismatch | Self::SnapshotMismatch | Self::WrongSnapshot
        )
    }
}

impl From<IrError> for ProtocolError {
    fn from(value: IrError) -> Self {
        match value {
            IrError::UnknownFunctionId(id) => Self::UnknownFunctionId(id),
            IrError::InvalidIr(reason) => Self::InvalidIr(reason),
        }
    }
}
