use crate::service::ir_service::FunctionId;
use crate::{Hash32, Identity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub job_address: Hash32,
    pub function_id: FunctionId,
    pub snapshot: Option<Hash32>,
    pub consumed_slot: u64,
    pub consumed_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectKind {
    Deposit,
    Withdraw,
    Borrow,
    Liquidation,
}

impl EffectKind {
    pub fn function_id(self) -> FunctionId {
        match self {
            Self::Deposit => FunctionId::Deposit,
            Self::Withdraw => FunctionId::Withdraw,
            Self::Borrow => FunctionId::Borrow,
            Self::Liquidation => FunctionId::LiqEligibility,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettlementParams {
    pub effect: EffectKind,
    pub user: Identity,
    pub asset: Identity,
    pub amount: u64,
    pub nonce: u64,
    pub conf_band_bp: u16,
    pub staleness_limit_slots: Option<u64>,
    pub snapshot: Option<Hash32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultPosition {
    pub balance: u64,
    pub debt: u64,
}

#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    pub consumption: ConsumptionRecord,
    pub position: VaultPosition,
}
