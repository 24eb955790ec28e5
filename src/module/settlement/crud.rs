use super::model::{ConsumptionRecord, EffectKind, SettlementOutcome, SettlementParams, VaultPosition};
use crate::app::AppState;
use crate::error::{EffectError, ProtocolError};
use crate::infra::lock_store;
use crate::module::event::model::ProtocolEvent;
use crate::module::job::model::{JobRecord, JobStatus};
use crate::module::oracle_snapshot::model::OracleSnapshotRecord;
use crate::service::hash_service::{ContextInput, OracleAnchor, context_digest, to_hex};
use crate::service::metrics_service;
use crate::{Hash32, Identity};
use chrono::Utc;
use tracing::{error, info, warn};

pub const LIQ_TICKET_ASSET_PAIR: &str = "SOL/USDC";
pub const LIQ_TICKET_LOT: u64 = 1_000_000_000;

pub fn execute_once<R, F>(
    state: &AppState,
    job_address: Hash32,
    snapshot: Option<Hash32>,
    effect: F,
) -> Result<(ConsumptionRecord, R), ProtocolError>
where
    F: FnOnce(
        &JobRecord,
        Option<&OracleSnapshotRecord>,
    ) -> Result<(R, Vec<ProtocolEvent>), ProtocolError>,
{
    let slot = state.current_slot();
    let mut inner = lock_store(&state.store)?;

    let job = inner
        .jobs
        .get(&job_address)
        .ok_or(ProtocolError::JobNotFound)?;
    if job.status != JobStatus::Finalized {
        return Err(ProtocolError::InvalidState {
            expected: JobStatus::Finalized,
            actual: job.status,
        });
    }

    // recomputed from the stored observation, not the caller's address
    let bound = match (job.external_ptr_hash(), snapshot) {
        (Some(ptr), Some(address)) => {
            let recorded = inner
                .snapshots
                .get(&address)
                .ok_or(ProtocolError::SnapshotNotFound)?;
            if recorded.recompute_ptr_hash() != ptr {
                metrics_service::inc_correctness_violations();
                metrics_service::set_last_error_ts(Utc::now().timestamp());
                error!(
                    job = %to_hex(&job_address),
                    snapshot = %to_hex(&address),
                    error_code = ProtocolError::WrongSnapshot.code(),
                    "correctness violation on settlement"
                );
                return Err(ProtocolError::WrongSnapshot);
            }
            Some(recorded)
        }
        (Some(_), None) => return Err(ProtocolError::MissingSnapshot),
        (None, _) => None,
    };

    if inner.consumed.contains_key(&job_address) {
        metrics_service::inc_replays_rejected();
        warn!(job = %to_hex(&job_address), "settlement replay rejected");
        return Err(ProtocolError::JobAlreadyConsumed);
    }

    let function_id = job.function_id();
    let bound_address = bound.map(|s| s.address);
    let (output, follow_up) = effect(job, bound).inspect_err(|e| {
        warn!(job = %to_hex(&job_address), error_code = e.code(), reason = %e, "settlement effect rejected");
    })?;

    let record = ConsumptionRecord {
        job_address,
        function_id,
        snapshot: bound_address,
        consumed_slot: slot,
        consumed_at: Utc::now().timestamp(),
    };
    inner.consumed.insert(job_address, record.clone());
    inner.emit(
        slot,
        ProtocolEvent::SettlementExecuted {
            job: to_hex(&job_address),
            function_id: function_id.code(),
        },
    );
    for event in follow_up {
        inner.emit(slot, event);
    }
    drop(inner);

    metrics_service::inc_settlements_executed();
    info!(job = %to_hex(&job_address), function = function_id.as_str(), slot, "settlement executed");
    Ok((record, output))
}

pub fn execute_settlement(
    state: &AppState,
    caller: Identity,
    job_address: Hash32,
    params: SettlementParams,
) -> Result<SettlementOutcome, ProtocolError> {
    let current_slot = state.current_slot();
    let staleness_limit = params
        .staleness_limit_slots
        .unwrap_or(state.config.default_staleness_limit_slots);

    let (consumption, position) =
        execute_once(state, job_address, params.snapshot, |job, snapshot| {
            check_effect(state, caller, &params, staleness_limit, current_slot, job, snapshot)?;
            let position = state
                .vaults
                .apply(params.effect, &params.asset, &params.user, params.amount)?;

            let mut follow_up = Vec::new();
            if params.effect == EffectKind::Liquidation {
                let deadline_slot =
                    current_slot.saturating_add(state.config.liq_ticket_deadline_slots);
                follow_up.push(ProtocolEvent::LiqTicket {
                    job: to_hex(&job_address),
                    ticket_digest: to_hex(&job.result_commitment().unwrap_or_default()),
                    asset_pair: LIQ_TICKET_ASSET_PAIR.to_string(),
                    lot: LIQ_TICKET_LOT,
                    discount_bp: state.config.liq_ticket_discount_bp,
                    deadline_slot,
                });
                info!(job = %to_hex(&job_address), deadline_slot, "liquidation ticket issued");
            }
            Ok((position, follow_up))
        })?;

    Ok(SettlementOutcome {
        consumption,
        position,
    })
}

fn check_effect(
    state: &AppState,
    caller: Identity,
    params: &SettlementParams,
    staleness_limit: u64,
    current_slot: u64,
    job: &JobRecord,
    snapshot: Option<&OracleSnapshotRecord>,
) -> Result<(), EffectError> {
    let expected = params.effect.function_id();
    if job.function_id() != expected {
        return Err(EffectError::bad_function(expected, job.function_id()));
    }
    if caller != job.submitter || params.user != job.submitter {
        return Err(EffectError::NotJobSubmitter);
    }

    let oracle = if job.kind.is_oracle_bound() {
        let snapshot = snapshot.ok_or(EffectError::MissingSnapshot)?;
        Some(OracleAnchor {
            oracle_program: snapshot.oracle_program,
            feed: snapshot.feed,
            observed_slot: snapshot.observed_slot,
            conf_band_bp: params.conf_band_bp,
            staleness_limit_slots: staleness_limit,
        })
    } else {
        None
    };
    let digest = context_digest(&ContextInput {
        tag: expected.context_tag(),
        program_id: &state.config.program_id,
        user: &params.user,
        asset: &params.asset,
        amount: params.amount,
        nonce: params.nonce,
        oracle,
    });
    if digest != job.context_data {
        return Err(EffectError::BadContextData);
    }

    if params.effect == EffectKind::Liquidation {
        let snapshot = snapshot.ok_or(EffectError::MissingSnapshot)?;
        if current_slot.saturating_sub(snapshot.observed_slot) > staleness_limit {
            return Err(EffectError::OracleStale {
                observed_slot: snapshot.observed_slot,
                current_slot,
                limit: staleness_limit,
            });
        }
    }
    Ok(())
}

pub fn get_consumption(
    state: &AppState,
    job_address: &Hash32,
) -> Result<Option<ConsumptionRecord>, ProtocolError> {
    let inner = lock_store(&state.store)?;
    if !inner.jobs.contains_key(job_address) {
        return Err(ProtocolError::JobNotFound);
    }
    Ok(inner.consumed.get(job_address).cloned())
}

pub fn get_vault_position(
    state: &AppState,
    asset: &Identity,
    user: &Identity,
) -> Result<VaultPosition, ProtocolError> {
    state.vaults.position(asset, user)
}
