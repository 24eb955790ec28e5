use crate::Hash32;
use crate::error::ProtocolError;
use crate::module::event::model::{EventRecord, ProtocolEvent};
use crate::module::job::model::JobRecord;
use crate::module::oracle_snapshot::model::OracleSnapshotRecord;
use crate::module::settlement::model::ConsumptionRecord;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct ProtocolStore {
    inner: Mutex<ProtocolStoreInner>,
}

#[derive(Debug, Default)]
pub struct ProtocolStoreInner {
    pub(crate) jobs: HashMap<Hash32, JobRecord>,
    pub(crate) snapshots: HashMap<Hash32, OracleSnapshotRecord>,
    pub(crate) consumed: HashMap<Hash32, ConsumptionRecord>,
    pub(crate) events: Vec<EventRecord>,
}

impl ProtocolStoreInner {
    pub(crate) fn emit(&mut self, slot: u64, event: ProtocolEvent) {
        let sequence = self.events.len() as u64;
        self.events.push(EventRecord {
            sequence,
            slot,
            emitted_at: Utc::now().timestamp(),
            event,
        });
    }
}

pub(crate) fn lock_store(
    store: &ProtocolStore,
) -> Result<MutexGuard<'_, ProtocolStoreInner>, ProtocolError> {
    store
        .inner
        .lock()
        .map_err(|_| ProtocolError::StoreUnavailable)
}
