//! Integration tests for the full wakeup cycle.
//!
//! Drive [`WakeupService::run_cycle`] against mock adapters and assert
//! on the decision outcomes, the persisted counters, and the ordering
//! guarantees the hardware relies on.

use core::time::Duration;

use crate::mock_hw::{journal, ActuatorCall, MockHardware, MockReporter, MockStore, RecordingSink};

use dripwake::app::events::CycleEvent;
use dripwake::app::ports::{Actuator, StateError};
use dripwake::app::service::WakeupService;
use dripwake::config::Config;
use dripwake::state::WakeupState;

fn service() -> WakeupService {
    WakeupService::new(Config::default())
}

fn state(pump: i32, mist: i32, postponed: u8) -> WakeupState {
    WakeupState {
        pump_cycles_remaining: pump,
        mist_cycles_remaining: mist,
        pump_postponements: postponed,
    }
}

/// Run one cycle and hand back everything a test might inspect.
fn run_cycle(
    store: &mut MockStore,
    humidity: f32,
    reporter: &mut MockReporter,
) -> (MockHardware, RecordingSink, Duration) {
    let svc = service();
    let mut hw = MockHardware::new(humidity);
    let mut sink = RecordingSink::new();
    let slept = svc.run_cycle(store, &mut hw, reporter, &mut sink);
    (hw, sink, slept)
}

// ── Cold boot ─────────────────────────────────────────────────

#[test]
fn cold_boot_applies_defaults_and_mists_immediately() {
    let mut store = MockStore::empty();
    let (hw, sink, _) = run_cycle(&mut store, 50.0, &mut MockReporter::working());

    assert!(sink.contains(&CycleEvent::ColdBoot));
    // Half the pump period, mist fired and reset, no postponements.
    assert_eq!(store.stored, Some(state(72, 12, 0)));
    assert_eq!(hw.pulses_of(Actuator::Mist), [135]);
    assert!(hw.pulses_of(Actuator::Pump).is_empty());
}

#[test]
fn corrupt_state_is_treated_as_cold_boot() {
    let mut store = MockStore::with_state(state(3, 3, 3));
    store.load_error = Some(StateError::Corrupted);
    let (_, sink, _) = run_cycle(&mut store, 50.0, &mut MockReporter::working());

    assert!(sink.contains(&CycleEvent::ColdBoot));
    assert_eq!(store.stored, Some(state(72, 12, 0)));
}

// ── Counting ──────────────────────────────────────────────────

#[test]
fn restored_counters_decrement_once_per_wakeup() {
    let mut store = MockStore::with_state(state(10, 5, 1));
    let (hw, sink, _) = run_cycle(&mut store, 70.0, &mut MockReporter::working());

    assert!(sink.contains(&CycleEvent::Restored(state(9, 4, 1))));
    assert_eq!(store.stored, Some(state(9, 4, 1)));
    assert!(hw.calls.is_empty(), "no actuation while counting");
}

// ── Mist ──────────────────────────────────────────────────────

#[test]
fn mist_fires_on_interval_and_resets() {
    let mut store = MockStore::with_state(state(10, 1, 0));
    let (hw, _, _) = run_cycle(&mut store, 99.0, &mut MockReporter::working());

    // No humidity gate: fires even in wet air.
    assert_eq!(hw.pulses_of(Actuator::Mist), [135]);
    assert_eq!(store.stored, Some(state(9, 12, 0)));
}

// ── Pump ──────────────────────────────────────────────────────

#[test]
fn dry_soil_triggers_two_pulses_with_pause() {
    let mut store = MockStore::with_state(state(1, 5, 0));
    let (hw, sink, _) = run_cycle(&mut store, 42.3, &mut MockReporter::working());

    assert_eq!(
        hw.calls,
        [
            ActuatorCall::Pulse {
                actuator: Actuator::Pump,
                secs: 7
            },
            ActuatorCall::Pause { secs: 300 },
            ActuatorCall::Pulse {
                actuator: Actuator::Pump,
                secs: 7
            },
        ]
    );
    assert!(sink.contains(&CycleEvent::PumpTriggered));
    assert_eq!(store.stored, Some(state(144, 4, 0)));
}

#[test]
fn wet_soil_postpones_by_short_interval() {
    let mut store = MockStore::with_state(state(1, 5, 0));
    let (hw, sink, _) = run_cycle(&mut store, 70.0, &mut MockReporter::working());

    assert!(hw.pulses_of(Actuator::Pump).is_empty());
    assert!(sink.contains(&CycleEvent::PumpPostponed { postponements: 1 }));
    assert_eq!(store.stored, Some(state(24, 4, 1)));
}

#[test]
fn trigger_resets_counters_regardless_of_previous_values() {
    let mut store = MockStore::with_state(state(-3, 50, 4));
    let (hw, _, _) = run_cycle(&mut store, 10.0, &mut MockReporter::working());

    assert_eq!(hw.pulses_of(Actuator::Pump).len(), 2);
    assert_eq!(store.stored, Some(state(144, 49, 0)));
}

#[test]
fn postponement_stops_at_cap_and_pump_fires() {
    let cap = Config::default().postpone_cap;
    let mut store = MockStore::with_state(state(1, 100, 0));

    // `cap` consecutive eligible wakeups over wet soil: all postponed.
    for expected in 1..=cap {
        let (hw, _, _) = run_cycle(&mut store, 75.0, &mut MockReporter::working());
        assert!(
            hw.pulses_of(Actuator::Pump).is_empty(),
            "postponement {} must not actuate",
            expected
        );
        assert_eq!(store.stored.unwrap().pump_postponements, expected);
        // Fast-forward to the next eligible wakeup.
        let mut s = store.stored.unwrap();
        s.pump_cycles_remaining = 1;
        store.stored = Some(s);
    }

    // (cap + 1)-th eligible wakeup: fires despite wet soil.
    let (hw, sink, _) = run_cycle(&mut store, 75.0, &mut MockReporter::working());
    assert_eq!(hw.pulses_of(Actuator::Pump).len(), 2);
    assert!(sink.contains(&CycleEvent::PumpTriggered));
    let after = store.stored.unwrap();
    assert_eq!(after.pump_postponements, 0);
    assert_eq!(after.pump_cycles_remaining, 144);
}

// ── Decrement-then-compare: counter of 1 is eligible the same wakeup ──

#[test]
fn counter_of_one_becomes_eligible_within_the_same_wakeup() {
    // {pump:1, mist:0, postponed:0}, humidity 70: mist interval elapsed,
    // pump decrements to 0 which IS eligible — and postpones, wet soil.
    let mut store = MockStore::with_state(state(1, 0, 0));
    let (hw, _, _) = run_cycle(&mut store, 70.0, &mut MockReporter::working());

    assert_eq!(hw.pulses_of(Actuator::Mist), [135]);
    assert!(hw.pulses_of(Actuator::Pump).is_empty());
    assert_eq!(store.stored, Some(state(24, 12, 1)));
}

// ── Persistence ordering and failure ──────────────────────────

#[test]
fn state_is_saved_before_any_network_traffic() {
    let j = journal();
    let mut store = MockStore::with_state(state(1, 5, 0)).with_journal(&j);
    let mut reporter = MockReporter::working().with_journal(&j);
    run_cycle(&mut store, 30.0, &mut reporter);

    assert_eq!(*j.borrow(), ["save", "connect", "report"]);
}

#[test]
fn save_failure_is_retried_once_and_succeeds() {
    let mut store = MockStore::with_state(state(10, 5, 0));
    store.fail_saves = 1;
    let (_, sink, _) = run_cycle(&mut store, 50.0, &mut MockReporter::working());

    assert_eq!(store.save_count, 1);
    assert!(sink.contains(&CycleEvent::StateSaved(state(9, 4, 0))));
}

#[test]
fn persistent_save_failure_still_reaches_sleep() {
    let mut store = MockStore::with_state(state(10, 5, 0));
    store.fail_saves = 2;
    let (_, sink, slept) = run_cycle(&mut store, 50.0, &mut MockReporter::working());

    assert_eq!(store.save_count, 0);
    assert!(sink.contains(&CycleEvent::StateSaveFailed(StateError::IoError)));
    assert_eq!(slept, Duration::from_millis(3_600_000));
}

// ── Reporting is advisory ─────────────────────────────────────

#[test]
fn connect_failure_changes_nothing_about_the_cycle() {
    let mut store = MockStore::with_state(state(1, 5, 0));
    let mut reporter = MockReporter::working();
    reporter.fail_connect = true;
    let (_, sink, slept) = run_cycle(&mut store, 30.0, &mut reporter);

    // Decision persisted, sleep on schedule, nothing delivered.
    assert_eq!(store.stored, Some(state(144, 4, 0)));
    assert!(reporter.delivered.is_empty());
    assert_eq!(slept, Duration::from_millis(3_600_000));
    assert!(matches!(
        sink.events.last(),
        Some(CycleEvent::EnteringSleep { .. })
    ));
}

#[test]
fn report_failure_does_not_alter_persisted_state() {
    let mut store = MockStore::with_state(state(10, 5, 2));
    let mut reporter = MockReporter::working();
    reporter.fail_report = true;
    let (_, sink, _) = run_cycle(&mut store, 50.0, &mut reporter);

    assert_eq!(store.stored, Some(state(9, 4, 2)));
    assert_eq!(store.save_count, 1);
    assert!(sink
        .events
        .iter()
        .any(|e| matches!(e, CycleEvent::ReportFailed(_))));
}

#[test]
fn delivered_report_mirrors_saved_state_and_humidity() {
    let mut store = MockStore::with_state(state(10, 5, 2));
    let mut reporter = MockReporter::working();
    run_cycle(&mut store, 64.4, &mut reporter);

    let saved = store.stored.unwrap();
    let record = reporter.delivered[0];
    assert_eq!(record.pump_cycles_remaining, saved.pump_cycles_remaining);
    assert_eq!(record.mist_cycles_remaining, saved.mist_cycles_remaining);
    assert_eq!(record.pump_postponements, saved.pump_postponements);
    assert!((record.humidity_percent - 64.4).abs() < f32::EPSILON);
}

// ── Sleep duration ────────────────────────────────────────────

#[test]
fn every_cycle_ends_with_the_configured_sleep_interval() {
    let mut store = MockStore::empty();
    let (_, sink, slept) = run_cycle(&mut store, 50.0, &mut MockReporter::working());

    assert_eq!(slept, Duration::from_millis(3_600_000));
    assert_eq!(
        sink.events.last(),
        Some(&CycleEvent::EnteringSleep {
            duration_ms: 3_600_000
        })
    );
}
