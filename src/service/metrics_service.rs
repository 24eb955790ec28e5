use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

static JOBS_SUBMITTED: AtomicU64 = AtomicU64::new(0);
static RESULTS_POSTED: AtomicU64 = AtomicU64::new(0);
static JOBS_FINALIZED: AtomicU64 = AtomicU64::new(0);
static SNAPSHOTS_RECORDED: AtomicU64 = AtomicU64::new(0);
static SETTLEMENTS_EXECUTED: AtomicU64 = AtomicU64::new(0);
static REPLAYS_REJECTED: AtomicU64 = AtomicU64::new(0);
static CORRECTNESS_VIOLATIONS: AtomicU64 = AtomicU64::new(0);

static LAST_ERROR_TS: AtomicI64 = AtomicI64::new(0);

#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub jobs_submitted: u64,
    pub results_posted: u64,
    pub jobs_finalized: u64,
    pub snapshots_recorded: u64,
    pub settlements_executed: u64,
    pub replays_rejected: u64,
    pub correctness_violations: u64,
    pub last_error_ts: i64,
}

pub fn inc_jobs_submitted() {
    JOBS_SUBMITTED.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_results_posted() {
    RESULTS_POSTED.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_jobs_finalized() {
    JOBS_FINALIZED.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_snapshots_recorded() {
    SNAPSHOTS_RECORDED.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_settlements_executed() {
    SETTLEMENTS_EXECUTED.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_replays_rejected() {
    REPLAYS_REJECTED.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_correctness_violations() {
    CORRECTNESS_VIOLATIONS.fetch_add(1, Ordering::Relaxed);
}

pub fn set_last_error_ts(ts: i64) {
    LAST_ERROR_TS.store(ts, Ordering::Relaxed);
}

pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        jobs_submitted: JOBS_SUBMITTED.load(Ordering::Relaxed),
        results_posted: RESULTS_POSTED.load(Ordering::Relaxed),
        jobs_finalized: JOBS_FINALIZED.load(Ordering::Relaxed),
        snapshots_recorded: SNAPSHOTS_RECORDED.load(Ordering::Relaxed),
        settlements_executed: SETTLEMENTS_EXECUTED.load(Ordering::Relaxed),
        replays_rejected: REPLAYS_REJECTED.load(Ordering::Relaxed),
        correctness_violations: CORRECTNESS_VIOLATIONS.load(Ordering::Relaxed),
        last_error_ts: LAST_ERROR_TS.load(Ordering::Relaxed),
    }
}
