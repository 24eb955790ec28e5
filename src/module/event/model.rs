use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProtocolEvent {
    JobSubmitted {
        job: String,
        submitter: String,
        commitment: String,
        da_ptr_hash: Option<String>,
        function_id: u16,
        context_data: String,
    },
    JobPosted {
        job: String,
        result_commitment: String,
        code_digest: String,
        external_ptr_hash: Option<String>,
    },
    JobFinalized {
        job: String,
    },
    OracleSnapshotRecorded {
        snapshot: String,
        oracle_program: String,
        feed: String,
        price_e9: i64,
        conf_e9: u64,
        observed_slot: u64,
        ptr_hash: String,
    },
    SettlementExecuted {
        job: String,
        function_id: u16,
    },
    LiqTicket {
        job: String,
        ticket_digest: String,
        asset_pair: String,
        lot: u64,
        discount_bp: u16,
        deadline_slot: u64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub sequence: u64,
    pub slot: u64,
    pub emitted_at: i64,
    pub event: ProtocolEvent,
}
