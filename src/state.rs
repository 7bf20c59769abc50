//! Durable wakeup state.
//!
//! [`WakeupState`] is the only data that survives deep sleep.  It is
//! restored at the start of every wakeup cycle, mutated by the decision
//! logic, and written back before the controller re-arms the sleep
//! timer.  Everything else is recomputed each cycle.

use serde::{Deserialize, Serialize};

/// Version prefixed to the serialized blob by the state store.  Bump on
/// any layout change; a mismatch on load reads as an absent blob.
pub const STATE_VERSION: u8 = 1;

/// Per-cycle counters carried across deep sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeupState {
    /// Wakeups until the pump is next eligible to run.
    pub pump_cycles_remaining: i32,
    /// Wakeups until the nebulisers next fire.
    pub mist_cycles_remaining: i32,
    /// Consecutive eligible wakeups on which the pump was skipped because
    /// the soil was already wet.  Capped by `Config::postpone_cap`.
    pub pump_postponements: u8,
}

impl WakeupState {
    /// State applied when nothing could be restored (power-on, corrupt
    /// blob).  The pump counter starts at half its period: after an
    /// outage of unknown length it is safer to water sooner.  Mist fires
    /// immediately.
    pub fn cold_boot(pump_period_wakeups: i32) -> Self {
        Self {
            pump_cycles_remaining: pump_period_wakeups / 2,
            mist_cycles_remaining: 0,
            pump_postponements: 0,
        }
    }

    /// Account for one elapsed wakeup interval.
    ///
    /// Decrement-then-compare convention: a restored counter of 1 becomes
    /// 0 here and is eligible within the same cycle.  The postponement
    /// counter carries over untouched.
    pub fn elapse_wakeup(&mut self) {
        self.pump_cycles_remaining = self.pump_cycles_remaining.saturating_sub(1);
        self.mist_cycles_remaining = self.mist_cycles_remaining.saturating_sub(1);
    }
}
