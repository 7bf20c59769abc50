//! Wakeup service — the decision core.
//!
//! One call to [`WakeupService::run_cycle`] executes a complete wakeup:
//! restore counters, sample humidity, drive the mist and pump relays,
//! persist the updated counters, report, and hand back the next sleep
//! duration.
//!
//! ```text
//!  StatePort ────▶ ┌────────────────────────┐ ──▶ EventSink
//!  SoilSensorPort ▶│      WakeupService      │ ──▶ ReporterPort
//!  ActuatorPort ◀──│  counters · postponement│
//!                  └────────────────────────┘
//! ```
//!
//! The service holds no state of its own between cycles — everything
//! durable lives in [`WakeupState`].  Cycles never overlap (the device is
//! fully asleep between them), so exclusivity over the state is
//! structural.

use core::time::Duration;

use log::{error, info, warn};

use crate::config::Config;
use crate::state::WakeupState;

use super::events::{CycleEvent, StatusReport};
use super::ports::{Actuator, ActuatorPort, EventSink, ReporterPort, SoilSensorPort, StatePort};

// ───────────────────────────────────────────────────────────────
// Pump decision
// ───────────────────────────────────────────────────────────────

/// Outcome of the pump evaluation for one wakeup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpDecision {
    /// Counter still positive — nothing to evaluate this cycle.
    NotEligible,
    /// Soil wet enough; watering pushed back by the short interval.
    Postponed,
    /// Pump pulses due this cycle.
    Triggered,
}

/// Decide the pump action for this wakeup.
///
/// The counter has already been decremented for the elapsed interval, so
/// a restored value of 1 is eligible in the same cycle.  Once
/// `pump_postponements` has reached the cap, humidity is ignored and the
/// pump fires — postponement can never starve the plants indefinitely.
pub fn decide_pump(state: &WakeupState, humidity_percent: f32, config: &Config) -> PumpDecision {
    if state.pump_cycles_remaining > 0 {
        return PumpDecision::NotEligible;
    }
    if humidity_percent >= config.humidity_threshold_percent
        && state.pump_postponements < config.postpone_cap
    {
        PumpDecision::Postponed
    } else {
        PumpDecision::Triggered
    }
}

// ───────────────────────────────────────────────────────────────
// WakeupService
// ───────────────────────────────────────────────────────────────

/// Executes one wakeup cycle end-to-end.
pub struct WakeupService {
    config: Config,
}

impl WakeupService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one full wakeup cycle and return the duration to sleep.
    ///
    /// Ordering is load-bearing: the state write happens before the
    /// network report, so a power loss mid-report never repeats an
    /// irrigation decision.  Nothing after the write can return early —
    /// the caller always receives a sleep duration.
    ///
    /// The `hw` parameter satisfies **both** [`SoilSensorPort`] and
    /// [`ActuatorPort`] — one adapter owns the probe and the relays.
    pub fn run_cycle(
        &self,
        store: &mut impl StatePort,
        hw: &mut (impl SoilSensorPort + ActuatorPort),
        reporter: &mut impl ReporterPort,
        sink: &mut impl EventSink,
    ) -> Duration {
        // 1. Restore counters, or fall back to cold-boot defaults.
        let mut state = match store.load() {
            Ok(mut prev) => {
                prev.elapse_wakeup();
                info!("state restored: {:?}", prev);
                sink.emit(&CycleEvent::Restored(prev));
                prev
            }
            Err(e) => {
                warn!("state unavailable ({}), applying cold-boot defaults", e);
                sink.emit(&CycleEvent::ColdBoot);
                WakeupState::cold_boot(self.config.pump_period_wakeups)
            }
        };

        // 2. Sample soil humidity.
        let humidity = hw.sample();
        info!("humidity: {:.1}%", humidity);
        sink.emit(&CycleEvent::HumiditySampled(humidity));

        // 3. Mist fires on its interval alone — no humidity gate.
        if state.mist_cycles_remaining <= 0 {
            info!("mist interval elapsed, pulsing nebulisers");
            hw.pulse(
                Actuator::Mist,
                Duration::from_secs(self.config.mist_pulse_secs.into()),
            );
            state.mist_cycles_remaining = self.config.mist_period_wakeups;
            sink.emit(&CycleEvent::MistTriggered);
        }

        // 4. Pump decision.
        match decide_pump(&state, humidity, &self.config) {
            PumpDecision::NotEligible => {}
            PumpDecision::Postponed => {
                state.pump_cycles_remaining = self.config.postpone_period_wakeups;
                state.pump_postponements = state.pump_postponements.saturating_add(1);
                info!(
                    "soil wet ({:.1}%), pump postponed ({} consecutive)",
                    humidity, state.pump_postponements
                );
                sink.emit(&CycleEvent::PumpPostponed {
                    postponements: state.pump_postponements,
                });
            }
            PumpDecision::Triggered => {
                self.pulse_pump(hw);
                state.pump_cycles_remaining = self.config.pump_period_wakeups;
                state.pump_postponements = 0;
                sink.emit(&CycleEvent::PumpTriggered);
            }
        }

        // 5. Persist before anything that can fail on the network.  A
        // lost write would repeat this cycle's watering on every wakeup.
        self.persist(store, &state, sink);

        // 6. Best-effort status report; failures never reach the caller.
        self.report(reporter, &state, humidity, sink);

        sink.emit(&CycleEvent::EnteringSleep {
            duration_ms: self.config.wakeup_interval_ms,
        });
        Duration::from_millis(self.config.wakeup_interval_ms)
    }

    fn pulse_pump(&self, hw: &mut impl ActuatorPort) {
        info!(
            "pump interval elapsed, {} pulse(s) of {} s",
            self.config.pump_pulse_count, self.config.pump_pulse_secs
        );
        let pulse = Duration::from_secs(self.config.pump_pulse_secs.into());
        let pause = Duration::from_secs(self.config.pump_inter_pulse_secs.into());
        for i in 0..self.config.pump_pulse_count {
            if i > 0 {
                hw.pause(pause);
            }
            hw.pulse(Actuator::Pump, pulse);
        }
    }

    fn persist(&self, store: &mut impl StatePort, state: &WakeupState, sink: &mut impl EventSink) {
        for attempt in 1..=2 {
            match store.save(state) {
                Ok(()) => {
                    sink.emit(&CycleEvent::StateSaved(*state));
                    return;
                }
                Err(e) if attempt == 1 => {
                    warn!("state save failed ({}), retrying", e);
                }
                Err(e) => {
                    // The next cycle cold-boots and waters early.
                    error!("state save failed after retry ({})", e);
                    sink.emit(&CycleEvent::StateSaveFailed(e));
                }
            }
        }
    }

    fn report(
        &self,
        reporter: &mut impl ReporterPort,
        state: &WakeupState,
        humidity: f32,
        sink: &mut impl EventSink,
    ) {
        let record = StatusReport::new(state, humidity);
        let outcome = reporter
            .connect()
            .and_then(|()| reporter.report(&record));
        match outcome {
            Ok(()) => sink.emit(&CycleEvent::ReportDelivered),
            Err(e) => {
                warn!("status report dropped ({})", e);
                sink.emit(&CycleEvent::ReportFailed(e));
            }
        }
    }
}
