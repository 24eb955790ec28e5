use super::model::OracleSnapshotRecord;
use crate::service::hash_service::to_hex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSnapshotRequest {
    #[serde(alias = "oracleProgram")]
    pub oracle_program: String,
    pub feed: String,
    #[serde(alias = "priceE9")]
    pub price_e9: i64,
    #[serde(alias = "confE9")]
    pub conf_e9: u64,
    #[serde(alias = "observedSlot")]
    pub observed_slot: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleSnapshotView {
    pub address: String,
    pub oracle_program: String,
    pub feed: String,
    pub price_e9: i64,
    pub conf_e9: u64,
    pub observed_slot: u64,
    pub ptr_hash: String,
    pub recorded_slot: u64,
    pub recorded_at: i64,
}

impl OracleSnapshotView {
    pub fn from_record(snapshot: &OracleSnapshotRecord) -> Self {
        Self {
            address: to_hex(&snapshot.address),
            oracle_program: to_hex(&snapshot.oracle_program),
            feed: to_hex(&snapshot.feed),
            price_e9: snapshot.price_e9,
            conf_e9: snapshot.conf_e9,
            observed_slot: snapshot.observed_slot,
            ptr_hash: to_hex(&snapshot.ptr_hash),
            recorded_slot: snapshot.recorded_slot,
            recorded_at: snapshot.recorded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSnapshotResponse {
    pub recorded: bool,
    pub idempotent: bool,
    pub snapshot: Option<OracleSnapshotView>,
    pub error_code: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetSnapshotResponse {
    pub found: bool,
    pub snapshot: Option<OracleSnapshotView>,
    pub error_code: Option<String>,
    pub reason: String,
}
