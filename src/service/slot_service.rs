use chrono::Utc;
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

pub trait SlotClock: Send + Sync + Debug {
    fn current_slot(&self) -> u64;
}

#[derive(Debug, Clone)]
pub struct WallClockSlots {
    pub genesis_unix_ms: i64,
    pub slot_duration_ms: u64,
}

impl SlotClock for WallClockSlots {
    fn current_slot(&self) -> u64 {
        let elapsed = Utc::now()
            .timestamp_millis()
            .saturating_sub(self.genesis_unix_ms)
            .max(0) as u64;
        elapsed / self.slot_duration_ms.max(1)
    }
}

#[derive(Debug, Default)]
pub struct ManualSlotClock {
    slot: AtomicU64,
}

impl ManualSlotClock {
    pub fn new(slot: u64) -> Self {
        Self {
            slot: AtomicU64::new(slot),
        }
    }

    pub fn set(&self, slot: u64) {
        self.slot.store(slot, Ordering::SeqCst);
    }

    pub fn advance(&self, slots: u64) -> u64 {
        self.slot.fetch_add(slots, Ordering::SeqCst) + slots
    }
}

impl SlotClock for ManualSlotClock {
    fn current_slot(&self) -> u64 {
        self.slot.load(Ordering::SeqCst)
    }
}
