use super::model::{ConsumptionRecord, EffectKind, VaultPosition};
use crate::service::hash_service::to_hex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteSettlementRequest {
    pub effect: EffectKind,
    pub user: String,
    pub asset: String,
    pub amount: u64,
    pub nonce: u64,
    #[serde(default, alias = "confBandBp")]
    pub conf_band_bp: u16,
    #[serde(default, alias = "stalenessLimitSlots")]
    pub staleness_limit_slots: Option<u64>,
    #[serde(default, alias = "snapshotAddress")]
    pub snapshot_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumptionView {
    pub job_address: String,
    pub function_id: u16,
    pub function: String,
    pub snapshot: Option<String>,
    pub consumed_slot: u64,
    pub consumed_at: i64,
}

impl ConsumptionView {
    pub fn from_record(record: &ConsumptionRecord) -> Self {
        Self {
            job_address: to_hex(&record.job_address),
            function_id: record.function_id.code(),
            function: record.function_id.as_str().to_string(),
            snapshot: record.snapshot.as_ref().map(to_hex),
            consumed_slot: record.consumed_slot,
            consumed_at: record.consumed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteSettlementResponse {
    pub executed: bool,
    pub consumption: Option<ConsumptionView>,
    pub position: Option<VaultPosition>,
    pub error_code: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetConsumptionResponse {
    pub found: bool,
    pub consumed: bool,
    pub consumption: Option<ConsumptionView>,
    pub error_code: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultPositionResponse {
    pub asset: String,
    pub user: String,
    pub position: Option<VaultPosition>,
    pub error_code: Option<String>,
    pub reason: String,
}
