//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured cycle events to the
//! serial logger.  A display or MQTT adapter would implement the same
//! trait.

use log::{info, warn};

use crate::app::events::CycleEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`CycleEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &CycleEvent) {
        match event {
            CycleEvent::ColdBoot => {
                info!("CYCLE | cold boot, defaults applied");
            }
            CycleEvent::Restored(s) => {
                info!(
                    "CYCLE | restored pump={} mist={} postponed={}",
                    s.pump_cycles_remaining, s.mist_cycles_remaining, s.pump_postponements
                );
            }
            CycleEvent::HumiditySampled(h) => {
                info!("CYCLE | humidity {:.1}%", h);
            }
            CycleEvent::MistTriggered => {
                info!("MIST  | triggered");
            }
            CycleEvent::PumpTriggered => {
                info!("PUMP  | triggered");
            }
            CycleEvent::PumpPostponed { postponements } => {
                info!("PUMP  | postponed ({} consecutive)", postponements);
            }
            CycleEvent::StateSaved(s) => {
                info!(
                    "STATE | saved pump={} mist={} postponed={}",
                    s.pump_cycles_remaining, s.mist_cycles_remaining, s.pump_postponements
                );
            }
            CycleEvent::StateSaveFailed(e) => {
                warn!("STATE | save failed: {}", e);
            }
            CycleEvent::ReportDelivered => {
                info!("NET   | report delivered");
            }
            CycleEvent::ReportFailed(e) => {
                warn!("NET   | report dropped: {}", e);
            }
            CycleEvent::EnteringSleep { duration_ms } => {
                info!("SLEEP | arming timer for {} ms", duration_ms);
            }
        }
    }
}
