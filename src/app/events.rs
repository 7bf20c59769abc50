//! Outbound application events.
//!
//! The [`WakeupService`](super::service::WakeupService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — log to serial, drive a display,
//! publish over the network, etc.

use crate::state::WakeupState;

use super::ports::{ReportError, StateError};

/// Structured events emitted during one wakeup cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleEvent {
    /// No state could be restored; cold-boot defaults applied.
    ColdBoot,

    /// State restored from the previous cycle (already decremented).
    Restored(WakeupState),

    /// A fresh humidity sample was taken.
    HumiditySampled(f32),

    /// The nebulisers ran for their configured duration.
    MistTriggered,

    /// The pump ran its pulse sequence.
    PumpTriggered,

    /// An eligible pump run was skipped — soil already wet.
    PumpPostponed { postponements: u8 },

    /// The cycle's state was written back to the store.
    StateSaved(WakeupState),

    /// The state write failed even after the local retry.
    StateSaveFailed(StateError),

    /// The status report reached the endpoint.
    ReportDelivered,

    /// The status report was dropped (connect or request failure).
    ReportFailed(ReportError),

    /// The cycle is complete; the sleep timer is about to be armed.
    EnteringSleep { duration_ms: u64 },
}

/// Status record sent to the report endpoint, best-effort, once per
/// cycle.  Mirrors the persisted counters plus the ephemeral humidity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusReport {
    pub pump_cycles_remaining: i32,
    pub mist_cycles_remaining: i32,
    pub pump_postponements: u8,
    pub humidity_percent: f32,
}

impl StatusReport {
    pub fn new(state: &WakeupState, humidity_percent: f32) -> Self {
        Self {
            pump_cycles_remaining: state.pump_cycles_remaining,
            mist_cycles_remaining: state.mist_cycles_remaining,
            pump_postponements: state.pump_postponements,
            humidity_percent,
        }
    }
}
