//! Canonical instruction encoding per function id.
//!
//! Layouts (slot indices are two bytes, high byte first; the threshold is a
//! little-endian `u32` in basis points):
//!
//! ```text
//! ADD / SUB : op | in0 | in1 | out                      (7 bytes)
//! GTE       : op | in0 | threshold_bp | in1 | out       (11 bytes)
//! ```

use crate::service::hash_service::code_digest;
use crate::Hash32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_LTV_BP: u32 = 5_000;
pub const DEFAULT_MIN_CR_BP: u32 = 15_000;

const SLOT_RESULT: u16 = 0;
const SLOT_LHS: u16 = 1;
const SLOT_RHS: u16 = 2;

const BINARY_LEN: usize = 7;
const GTE_LEN: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IrError {
    #[error("unknown function id {0}")]
    UnknownFunctionId(u16),
    #[error("invalid ir: {0}")]
    InvalidIr(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    Add = 0x01,
    Sub = 0x02,
    Mul = 0x03,
    MulCst = 0x04,
    Gte = 0x05,
}

impl TryFrom<u8> for Opcode {
    type Error = IrError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::Add),
            0x02 => Ok(Self::Sub),
            0x03 => Ok(Self::Mul),
            0x04 => Ok(Self::MulCst),
            0x05 => Ok(Self::Gte),
            other => Err(IrError::InvalidIr(format!("unknown opcode 0x{other:02x}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum FunctionId {
    Deposit,
    Borrow,
    Withdraw,
    LiqEligibility,
}

impl FunctionId {
    pub const fn code(self) -> u16 {
        match self {
            Self::Deposit => 100,
            Self::Borrow => 200,
            Self::Withdraw => 300,
            Self::LiqEligibility => 400,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::Borrow => "BORROW",
            Self::Withdraw => "WITHDRAW",
            Self::LiqEligibility => "LIQ_ELIGIBILITY",
        }
    }

    pub fn context_tag(self) -> &'static [u8] {
        match self {
            Self::Deposit => b"deposit-v1",
            Self::Borrow => b"borrow-v1",
            Self::Withdraw => b"withdraw-v1",
            Self::LiqEligibility => b"liq-v1",
        }
    }
}

impl TryFrom<u16> for FunctionId {
    type Error = IrError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            100 => Ok(Self::Deposit),
            200 => Ok(Self::Borrow),
            300 => Ok(Self::Withdraw),
            400 => Ok(Self::LiqEligibility),
            other => Err(IrError::UnknownFunctionId(other)),
        }
    }
}

impl From<FunctionId> for u16 {
    fn from(value: FunctionId) -> Self {
        value.code()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrParams {
    pub ltv_bp: Option<u32>,
    pub min_cr_bp: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunctionKind {
    Deposit,
    Withdraw,
    Borrow { ltv_bp: u32 },
    LiqEligibility { min_cr_bp: u32 },
}

impl FunctionKind {
    pub fn from_params(function_id: FunctionId, params: &IrParams) -> Self {
        match function_id {
            FunctionId::Deposit => Self::Deposit,
            FunctionId::Withdraw => Self::Withdraw,
            FunctionId::Borrow => Self::Borrow {
                ltv_bp: params.ltv_bp.unwrap_or(DEFAULT_LTV_BP),
            },
            FunctionId::LiqEligibility => Self::LiqEligibility {
                min_cr_bp: params.min_cr_bp.unwrap_or(DEFAULT_MIN_CR_BP),
            },
        }
    }

    pub fn function_id(&self) -> FunctionId {
        match self {
            Self::Deposit => FunctionId::Deposit,
            Self::Withdraw => FunctionId::Withdraw,
            Self::Borrow { .. } => FunctionId::Borrow,
            Self::LiqEligibility { .. } => FunctionId::LiqEligibility,
        }
    }

    pub fn is_oracle_bound(&self) -> bool {
        !matches!(self, Self::Deposit)
    }

    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Deposit => build_deposit_ir(),
            Self::Withdraw => build_withdraw_ir(),
            Self::Borrow { ltv_bp } => build_borrow_ir(*ltv_bp),
            Self::LiqEligibility { min_cr_bp } => build_liq_eligibility_ir(*min_cr_bp),
        }
    }

    pub fn code_digest(&self) -> Hash32 {
        code_digest(&self.encode())
    }
}

pub fn build_deposit_ir() -> Vec<u8> {
    binary_op(Opcode::Add)
}

pub fn build_withdraw_ir() -> Vec<u8> {
    binary_op(Opcode::Sub)
}

pub fn build_borrow_ir(ltv_bp: u32) -> Vec<u8> {
    threshold_op(ltv_bp)
}

pub fn build_liq_eligibility_ir(min_cr_bp: u32) -> Vec<u8> {
    threshold_op(min_cr_bp)
}

pub fn get_ir_for_function(function_id: u16, params: &IrParams) -> Result<Vec<u8>, IrError> {
    let function_id = FunctionId::try_from(function_id)?;
    Ok(FunctionKind::from_params(function_id, params).encode())
}

pub fn decode_ir(function_id: FunctionId, ir: &[u8]) -> Result<FunctionKind, IrError> {
    let kind = match function_id {
        FunctionId::Deposit => FunctionKind::Deposit,
        FunctionId::Withdraw => FunctionKind::Withdraw,
        FunctionId::Borrow => FunctionKind::Borrow {
            ltv_bp: read_threshold(ir)?,
        },
        FunctionId::LiqEligibility => FunctionKind::LiqEligibility {
            min_cr_bp: read_threshold(ir)?,
        },
    };

    if let Some(op) = ir.first() {
        Opcode::try_from(*op)?;
    }
    let canonical = kind.encode();
    if canonical.as_slice() != ir {
        return Err(IrError::InvalidIr(format!(
            "ir is not the canonical {} encoding ({} bytes, expected {})",
            function_id.as_str(),
            ir.len(),
            canonical.len()
        )));
    }
    Ok(kind)
}

fn binary_op(op: Opcode) -> Vec<u8> {
    let mut ir = Vec::with_capacity(BINARY_LEN);
    ir.push(op as u8);
    ir.extend_from_slice(&SLOT_LHS.to_be_bytes());
    ir.extend_from_slice(&SLOT_RHS.to_be_bytes());
    ir.extend_from_slice(&SLOT_RESULT.to_be_bytes());
    ir
}

fn threshold_op(threshold_bp: u32) -> Vec<u8> {
    let mut ir = Vec::with_capacity(GTE_LEN);
    ir.push(Opcode::Gte as u8);
    ir.extend_from_slice(&SLOT_LHS.to_be_bytes());
    ir.extend_from_slice(&threshold_bp.to_le_bytes());
    ir.extend_from_slice(&SLOT_RHS.to_be_bytes());
    ir.extend_from_slice(&SLOT_RESULT.to_be_bytes());
    ir
}

fn read_threshold(ir: &[u8]) -> Result<u32, IrError> {
    if ir.len() != GTE_LEN {
        return Err(IrError::InvalidIr(format!(
            "threshold ir must be {GTE_LEN} bytes, got {}",
            ir.len()
        )));
    }
    let mut threshold = [0u8; 4];
    threshold.copy_from_slice(&ir[3..7]);
    Ok(u32::from_le_bytes(threshold))
}
