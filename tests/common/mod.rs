#![allow(dead_code)]

use confidential_coprocessor::app::AppState;
use confidential_coprocessor::config::environment::AppConfig;
use confidential_coprocessor::module::job::crud;
use confidential_coprocessor::module::job::model::{IrSource, JobRecord, PostResult, SubmitJob};
use confidential_coprocessor::module::oracle_snapshot;
use confidential_coprocessor::module::oracle_snapshot::model::{
    OracleSnapshotRecord, RecordSnapshot,
};
use confidential_coprocessor::service::hash_service::{
    ContextInput, OracleAnchor, context_digest, fresh_commitment,
};
use confidential_coprocessor::service::ir_service::{FunctionId, IrParams};
use confidential_coprocessor::service::slot_service::ManualSlotClock;
use confidential_coprocessor::{Hash32, Identity};
use std::sync::Arc;

pub const EXECUTOR: Identity = [0xe1; 32];
pub const RECORDER: Identity = [0xe2; 32];
pub const SUBMITTER: Identity = [0x5a; 32];
pub const STRANGER: Identity = [0x66; 32];
pub const PROGRAM_ID: Identity = [0x11; 32];
pub const ASSET: Identity = [0xa5; 32];
pub const ORACLE_PROGRAM: Identity = [0x01; 32];
pub const FEED: Identity = [0x02; 32];

pub const OBSERVED_SLOT: u64 = 1_000_000;
pub const PRICE_E9: i64 = 25_000_000_000;
pub const CONF_E9: u64 = 50_000_000;
pub const CONF_BAND_BP: u16 = 100;
pub const STALENESS_LIMIT: u64 = 300;

pub fn test_config() -> AppConfig {
    AppConfig {
        rust_env: "test".to_string(),
        api_host: "127.0.0.1".to_string(),
        api_port: 0,
        executor: EXECUTOR,
        oracle_recorder: RECORDER,
        program_id: PROGRAM_ID,
        max_ir_bytes: 2048,
        default_staleness_limit_slots: STALENESS_LIMIT,
        slot_duration_ms: 400,
        genesis_unix_ms: 0,
        liq_ticket_deadline_slots: 150,
        liq_ticket_discount_bp: 500,
        internal_auth_enabled: false,
        internal_auth_secret: None,
    }
}

/// State driven by a manual clock starting just after the fixture snapshot.
pub fn test_state() -> (AppState, Arc<ManualSlotClock>) {
    let clock = Arc::new(ManualSlotClock::new(OBSERVED_SLOT + 10));
    let state = AppState::with_clock(test_config(), clock.clone());
    (state, clock)
}

pub fn snapshot_request() -> RecordSnapshot {
    RecordSnapshot {
        oracle_program: ORACLE_PROGRAM,
        feed: FEED,
        price_e9: PRICE_E9,
        conf_e9: CONF_E9,
        observed_slot: OBSERVED_SLOT,
    }
}

pub fn record_fixture_snapshot(state: &AppState) -> OracleSnapshotRecord {
    oracle_snapshot::crud::record_snapshot(state, RECORDER, snapshot_request())
        .expect("record snapshot")
        .snapshot
}

pub fn unanchored_context(function_id: FunctionId, amount: u64, nonce: u64) -> Hash32 {
    context_digest(&ContextInput {
        tag: function_id.context_tag(),
        program_id: &PROGRAM_ID,
        user: &SUBMITTER,
        asset: &ASSET,
        amount,
        nonce,
        oracle: None,
    })
}

pub fn anchored_context(
    function_id: FunctionId,
    amount: u64,
    nonce: u64,
    snapshot: &OracleSnapshotRecord,
) -> Hash32 {
    context_digest(&ContextInput {
        tag: function_id.context_tag(),
        program_id: &PROGRAM_ID,
        user: &SUBMITTER,
        asset: &ASSET,
        amount,
        nonce,
        oracle: Some(OracleAnchor {
            oracle_program: snapshot.oracle_program,
            feed: snapshot.feed,
            observed_slot: snapshot.observed_slot,
            conf_band_bp: CONF_BAND_BP,
            staleness_limit_slots: STALENESS_LIMIT,
        }),
    })
}

pub fn submit(state: &AppState, function_id: FunctionId, context_data: Hash32) -> JobRecord {
    crud::submit_job(
        state,
        SUBMITTER,
        SubmitJob {
            commitment: fresh_commitment(),
            da_ptr_hash: None,
            reveal_after_slot: 0,
            function_id: function_id.code(),
            context_data,
            ir: IrSource::Reference(IrParams::default()),
        },
    )
    .expect("submit job")
}

pub fn post_request(job: &JobRecord, snapshot: Option<&OracleSnapshotRecord>) -> PostResult {
    PostResult {
        result_commitment: [0xcc; 32],
        code_digest: job.kind.code_digest(),
        external_ptr_hash: snapshot.map(|s| s.recompute_ptr_hash()),
        snapshot: snapshot.map(|s| s.address),
    }
}

/// Submits, posts with the canonical digest and finalizes.
pub fn finalized_job(
    state: &AppState,
    function_id: FunctionId,
    context_data: Hash32,
    snapshot: Option<&OracleSnapshotRecord>,
) -> JobRecord {
    let job = submit(state, function_id, context_data);
    crud::post_result(state, EXECUTOR, job.address, post_request(&job, snapshot))
        .expect("post result");
    crud::finalize(state, job.address).expect("finalize")
}
