mod common;

use common::{
    EXECUTOR, RECORDER, STRANGER, SUBMITTER, anchored_context, finalized_job, post_request,
    record_fixture_snapshot, snapshot_request, submit, test_state, unanchored_context,
};
use confidential_coprocessor::error::ProtocolError;
use confidential_coprocessor::module::event::crud::list_events;
use confidential_coprocessor::module::event::model::ProtocolEvent;
use confidential_coprocessor::module::job::crud;
use confidential_coprocessor::module::job::model::{IrSource, JobStatus, SubmitJob};
use confidential_coprocessor::module::oracle_snapshot;
use confidential_coprocessor::service::hash_service::{code_digest, oracle_pointer_hash};
use confidential_coprocessor::service::ir_service::{
    FunctionId, FunctionKind, IrParams, build_borrow_ir, build_deposit_ir,
};

fn submit_request(commitment: [u8; 32], function_id: FunctionId, ir: IrSource) -> SubmitJob {
    SubmitJob {
        commitment,
        da_ptr_hash: Some([0xda; 32]),
        reveal_after_slot: 0,
        function_id: function_id.code(),
        context_data: [0x42; 32],
        ir,
    }
}

#[test]
fn resubmitting_same_commitment_and_submitter_is_rejected() {
    let (state, _) = test_state();
    let req = submit_request([9; 32], FunctionId::Deposit, IrSource::Reference(IrParams::default()));

    crud::submit_job(&state, SUBMITTER, req.clone()).expect("first submit");
    let err = crud::submit_job(&state, SUBMITTER, req.clone()).unwrap_err();
    assert_eq!(err, ProtocolError::DuplicateCommitment);
    assert!(err.is_retryable());

    // A different submitter with the same commitment gets its own job.
    crud::submit_job(&state, STRANGER, req).expect("other submitter");
}

#[test]
fn deposit_job_runs_to_finalized_with_canonical_digest() {
    let (state, _) = test_state();
    let job = submit(&state, FunctionId::Deposit, unanchored_context(FunctionId::Deposit, 10, 1));
    assert_eq!(job.status, JobStatus::Submitted);

    let posted = crud::post_result(&state, EXECUTOR, job.address, post_request(&job, None))
        .expect("post result");
    assert_eq!(posted.status, JobStatus::Posted);

    let finalized = crud::finalize(&state, job.address).expect("finalize");
    assert_eq!(finalized.status, JobStatus::Finalized);
    assert_eq!(
        finalized.expected_code_digest(),
        Some(code_digest(&build_deposit_ir()))
    );
    assert_eq!(finalized.result_commitment(), Some([0xcc; 32]));
    assert_eq!(finalized.transitions.len(), 3);

    let stored = crud::get_job(&state, &job.address).expect("get job");
    assert_eq!(stored.status, JobStatus::Finalized);
}

#[test]
fn transitions_cannot_be_reapplied_or_skipped() {
    let (state, _) = test_state();
    let job = submit(&state, FunctionId::Deposit, [1; 32]);

    let err = crud::finalize(&state, job.address).unwrap_err();
    assert_eq!(
        err,
        ProtocolError::InvalidState {
            expected: JobStatus::Posted,
            actual: JobStatus::Submitted,
        }
    );

    crud::post_result(&state, EXECUTOR, job.address, post_request(&job, None)).expect("post");
    let err = crud::post_result(&state, EXECUTOR, job.address, post_request(&job, None))
        .unwrap_err();
    assert!(matches!(err, ProtocolError::InvalidState { .. }));

    crud::finalize(&state, job.address).expect("finalize");
    let err = crud::finalize(&state, job.address).unwrap_err();
    assert!(matches!(err, ProtocolError::InvalidState { .. }));
}

#[test]
fn only_the_executor_may_post_results() {
    let (state, _) = test_state();
    let job = submit(&state, FunctionId::Deposit, [1; 32]);

    let err = crud::post_result(&state, SUBMITTER, job.address, post_request(&job, None))
        .unwrap_err();
    assert_eq!(err, ProtocolError::Unauthorized { role: "executor" });
    assert_eq!(
        crud::get_job(&state, &job.address).unwrap().status,
        JobStatus::Submitted
    );
}

#[test]
fn wrong_code_digest_is_a_correctness_violation() {
    let (state, _) = test_state();
    let job = submit(&state, FunctionId::Deposit, [1; 32]);
    let mut req = post_request(&job, None);
    req.code_digest = code_digest(&build_borrow_ir(5_000));

    let err = crud::post_result(&state, EXECUTOR, job.address, req).unwrap_err();
    assert_eq!(err, ProtocolError::CodeDigestMismatch);
    assert!(err.is_correctness_violation());
    let stored = crud::get_job(&state, &job.address).unwrap();
    assert_eq!(stored.status, JobStatus::Submitted);
    assert!(stored.result.is_none());
}

#[test]
fn borrow_digest_tracks_the_ltv_parameter() {
    let (state, _) = test_state();
    let snapshot = record_fixture_snapshot(&state);
    let job = crud::submit_job(
        &state,
        SUBMITTER,
        submit_request(
            [3; 32],
            FunctionId::Borrow,
            IrSource::Reference(IrParams {
                ltv_bp: Some(7_000),
                min_cr_bp: None,
            }),
        ),
    )
    .expect("submit");
    assert_eq!(job.kind, FunctionKind::Borrow { ltv_bp: 7_000 });

    let mut req = post_request(&job, Some(&snapshot));
    req.code_digest = code_digest(&build_borrow_ir(5_000));
    let err = crud::post_result(&state, EXECUTOR, job.address, req).unwrap_err();
    assert_eq!(err, ProtocolError::CodeDigestMismatch);

    let mut req = post_request(&job, Some(&snapshot));
    req.code_digest = code_digest(&build_borrow_ir(7_000));
    crud::post_result(&state, EXECUTOR, job.address, req).expect("post with matching ltv");
}

#[test]
fn inline_ir_must_be_canonical_and_within_limit() {
    let (state, _) = test_state();

    let job = crud::submit_job(
        &state,
        SUBMITTER,
        submit_request([4; 32], FunctionId::Deposit, IrSource::Inline(build_deposit_ir())),
    )
    .expect("canonical inline ir");
    assert_eq!(
        job.submitted_ir_digest,
        Some(code_digest(&build_deposit_ir()))
    );

    let mut tampered = build_deposit_ir();
    tampered[6] = 0x01;
    let err = crud::submit_job(
        &state,
        SUBMITTER,
        submit_request([5; 32], FunctionId::Deposit, IrSource::Inline(tampered)),
    )
    .unwrap_err();
    assert!(matches!(err, ProtocolError::InvalidIr(_)));

    let err = crud::submit_job(
        &state,
        SUBMITTER,
        submit_request([6; 32], FunctionId::Deposit, IrSource::Inline(vec![0x01; 2049])),
    )
    .unwrap_err();
    assert_eq!(err, ProtocolError::IrTooLarge { len: 2049, max: 2048 });
}

#[test]
fn unknown_function_id_is_rejected() {
    let (state, _) = test_state();
    let mut req = submit_request([7; 32], FunctionId::Deposit, IrSource::Reference(IrParams::default()));
    req.function_id = 150;
    let err = crud::submit_job(&state, SUBMITTER, req).unwrap_err();
    assert_eq!(err, ProtocolError::UnknownFunctionId(150));
}

#[test]
fn price_sensitive_jobs_need_a_recorded_snapshot() {
    let (state, _) = test_state();
    let job = submit(&state, FunctionId::LiqEligibility, [8; 32]);

    let err = crud::post_result(&state, EXECUTOR, job.address, post_request(&job, None))
        .unwrap_err();
    assert_eq!(err, ProtocolError::MissingSnapshot);

    // Pointer hash supplied but the snapshot was never recorded.
    let mut req = post_request(&job, None);
    req.external_ptr_hash = Some(oracle_pointer_hash(
        &common::ORACLE_PROGRAM,
        &common::FEED,
        common::PRICE_E9,
        common::CONF_E9,
        common::OBSERVED_SLOT,
    ));
    req.snapshot = Some([0xab; 32]);
    let err = crud::post_result(&state, EXECUTOR, job.address, req).unwrap_err();
    assert_eq!(err, ProtocolError::MissingSnapshot);

    let snapshot = record_fixture_snapshot(&state);
    crud::post_result(&state, EXECUTOR, job.address, post_request(&job, Some(&snapshot)))
        .expect("post with bound snapshot");
}

#[test]
fn liquidation_job_binds_the_recorded_observation() {
    let (state, _) = test_state();
    let snapshot = record_fixture_snapshot(&state);
    let context = anchored_context(FunctionId::LiqEligibility, 100, 1, &snapshot);

    let job = finalized_job(&state, FunctionId::LiqEligibility, context, Some(&snapshot));
    assert_eq!(job.status, JobStatus::Finalized);
    assert_eq!(job.external_ptr_hash(), Some(snapshot.ptr_hash));

    // Same flow against a pointer hash computed from a different price.
    let other = submit(&state, FunctionId::LiqEligibility, context);
    let mut req = post_request(&other, Some(&snapshot));
    req.external_ptr_hash = Some(oracle_pointer_hash(
        &snapshot.oracle_program,
        &snapshot.feed,
        snapshot.price_e9 + 1,
        snapshot.conf_e9,
        snapshot.observed_slot,
    ));
    let err = crud::post_result(&state, EXECUTOR, other.address, req).unwrap_err();
    assert_eq!(err, ProtocolError::SnapshotMismatch);
    assert_eq!(
        crud::get_job(&state, &other.address).unwrap().status,
        JobStatus::Submitted
    );
}

#[test]
fn snapshot_registry_is_append_only() {
    let (state, _) = test_state();
    let first = oracle_snapshot::crud::record_snapshot(&state, RECORDER, snapshot_request())
        .expect("record");
    assert!(!first.idempotent);

    let again = oracle_snapshot::crud::record_snapshot(&state, RECORDER, snapshot_request())
        .expect("identical re-record");
    assert!(again.idempotent);
    assert_eq!(again.snapshot, first.snapshot);

    let mut changed = snapshot_request();
    changed.price_e9 += 1;
    let err = oracle_snapshot::crud::record_snapshot(&state, RECORDER, changed).unwrap_err();
    assert_eq!(err, ProtocolError::SnapshotConflict);

    let stored = oracle_snapshot::crud::get_snapshot(&state, &first.snapshot.address).unwrap();
    assert_eq!(stored.price_e9, common::PRICE_E9);

    let err = oracle_snapshot::crud::record_snapshot(&state, STRANGER, snapshot_request())
        .unwrap_err();
    assert!(matches!(err, ProtocolError::Unauthorized { .. }));
}

#[test]
fn lifecycle_emits_ordered_events() {
    let (state, _) = test_state();
    let job = finalized_job(&state, FunctionId::Deposit, [1; 32], None);

    let events = list_events(&state, 0).unwrap();
    let kinds: Vec<_> = events.iter().map(|e| &e.event).collect();
    assert!(matches!(kinds[0], ProtocolEvent::JobSubmitted { function_id: 100, .. }));
    assert!(matches!(kinds[1], ProtocolEvent::JobPosted { .. }));
    assert!(matches!(kinds[2], ProtocolEvent::JobFinalized { .. }));
    assert!(events.windows(2).all(|w| w[0].sequence < w[1].sequence));
    assert_eq!(crud::get_job(&state, &job.address).unwrap().status, JobStatus::Finalized);
}
