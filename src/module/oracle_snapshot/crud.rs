use super::model::{OracleSnapshotRecord, RecordSnapshot, RecordedSnapshot};
use crate::app::AppState;
use crate::error::ProtocolError;
use crate::infra::lock_store;
use crate::module::event::model::ProtocolEvent;
use crate::service::hash_service::{oracle_pointer_hash, snapshot_address, to_hex};
use crate::service::metrics_service;
use crate::{Hash32, Identity};
use chrono::Utc;
use tracing::{info, warn};

pub fn record_snapshot(
    state: &AppState,
    caller: Identity,
    req: RecordSnapshot,
) -> Result<RecordedSnapshot, ProtocolError> {
    if caller != state.config.oracle_recorder {
        return Err(ProtocolError::Unauthorized {
            role: "oracle recorder",
        });
    }

    let address = snapshot_address(&req.oracle_program, &req.feed, req.observed_slot);
    let slot = state.current_slot();
    let mut inner = lock_store(&state.store)?;

    if let Some(existing) = inner.snapshots.get(&address) {
        if existing.same_observation(&req) {
            return Ok(RecordedSnapshot {
                snapshot: existing.clone(),
                idempotent: true,
            });
        }
        warn!(
            snapshot = %to_hex(&address),
            observed_slot = req.observed_slot,
            "conflicting snapshot re-record refused"
        );
        return Err(ProtocolError::SnapshotConflict);
    }

    let snapshot = OracleSnapshotRecord {
        address,
        oracle_program: req.oracle_program,
        feed: req.feed,
        price_e9: req.price_e9,
        conf_e9: req.conf_e9,
        observed_slot: req.observed_slot,
        ptr_hash: oracle_pointer_hash(
            &req.oracle_program,
            &req.feed,
            req.price_e9,
            req.conf_e9,
            req.observed_slot,
        ),
        recorded_slot: slot,
        recorded_at: Utc::now().timestamp(),
    };
    inner.snapshots.insert(address, snapshot.clone());
    inner.emit(
        slot,
        ProtocolEvent::OracleSnapshotRecorded {
            snapshot: to_hex(&address),
            oracle_program: to_hex(&snapshot.oracle_program),
            feed: to_hex(&snapshot.feed),
            price_e9: snapshot.price_e9,
            conf_e9: snapshot.conf_e9,
            observed_slot: snapshot.observed_slot,
            ptr_hash: to_hex(&snapshot.ptr_hash),
        },
    );
    drop(inner);

    metrics_service::inc_snapshots_recorded();
    info!(
        snapshot = %to_hex(&address),
        observed_slot = snapshot.observed_slot,
        price_e9 = snapshot.price_e9,
        "oracle snapshot recorded"
    );
    Ok(RecordedSnapshot {
        snapshot,
        idempotent: false,
    })
}

pub fn get_snapshot(
    state: &AppState,
    address: &Hash32,
) -> Result<OracleSnapshotRecord, ProtocolError> {
    let inner = lock_store(&state.store)?;
    inner
        .snapshots
        .get(address)
        .cloned()
        .ok_or(ProtocolError::SnapshotNotFound)
}
