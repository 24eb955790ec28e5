use super::model::EventRecord;
use crate::app::AppState;
use crate::error::ProtocolError;
use crate::infra::lock_store;

pub fn list_events(state: &AppState, since: u64) -> Result<Vec<EventRecord>, ProtocolError> {
    let inner = lock_store(&state.store)?;
    Ok(inner
        .events
        .iter()
        .filter(|e| e.sequence >= since)
        .cloned()
        .collect())
}
