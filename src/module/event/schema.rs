use super::model::EventRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListEventsQuery {
    #[serde(default)]
    pub since: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEventsResponse {
    pub events: Vec<EventRecord>,
    pub error_code: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthMetricsView {
    pub jobs_submitted: u64,
    pub results_posted: u64,
    pub jobs_finalized: u64,
    pub snapshots_recorded: u64,
    pub settlements_executed: u64,
    pub replays_rejected: u64,
    pub correctness_violations: u64,
    pub last_error_ts: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub env: String,
    pub current_slot: u64,
    pub metrics: HealthMetricsView,
}
