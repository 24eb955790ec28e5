use crate::service::hash_service::oracle_pointer_hash;
use crate::{Hash32, Identity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleSnapshotRecord {
    pub address: Hash32,
    pub oracle_program: Identity,
    pub feed: Identity,
    pub price_e9: i64,
    pub conf_e9: u64,
    pub observed_slot: u64,
    pub ptr_hash: Hash32,
    pub recorded_slot: u64,
    pub recorded_at: i64,
}

impl OracleSnapshotRecord {
    pub fn recompute_ptr_hash(&self) -> Hash32 {
        oracle_pointer_hash(
            &self.oracle_program,
            &self.feed,
            self.price_e9,
            self.conf_e9,
            self.observed_slot,
        )
    }

    pub fn same_observation(&self, req: &RecordSnapshot) -> bool {
        self.oracle_program == req.oracle_program
            && self.feed == req.feed
            && self.observed_slot == req.observed_slot
            && self.price_e9 == req.price_e9
            && self.conf_e9 == req.conf_e9
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSnapshot {
    pub oracle_program: Identity,
    pub feed: Identity,
    pub price_e9: i64,
    pub conf_e9: u64,
    pub observed_slot: u64,
}

#[derive(Debug, Clone)]
pub struct RecordedSnapshot {
    pub snapshot: OracleSnapshotRecord,
    pub idempotent: bool,
}
