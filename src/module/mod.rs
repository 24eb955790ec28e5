pub mod error;
pub mod event;
pub mod job;
pub mod oracle_snapshot;
pub mod settlement;
