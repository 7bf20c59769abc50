//! Mock adapters for integration tests.
//!
//! Records every actuator, store, and reporter call so tests can assert
//! on the full history — including the save-before-report ordering —
//! without touching real GPIO or the network.

use std::cell::RefCell;
use std::rc::Rc;

use core::time::Duration;

use dripwake::app::events::{CycleEvent, StatusReport};
use dripwake::app::ports::{
    Actuator, ActuatorPort, EventSink, ReportError, ReporterPort, SoilSensorPort, StateError,
    StatePort,
};
use dripwake::state::WakeupState;

/// Shared call journal for cross-adapter ordering assertions.
pub type Journal = Rc<RefCell<Vec<&'static str>>>;

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Pulse { actuator: Actuator, secs: u64 },
    Pause { secs: u64 },
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Humidity percentage returned by every sample.
    pub humidity: f32,
    pub calls: Vec<ActuatorCall>,
}

impl MockHardware {
    pub fn new(humidity: f32) -> Self {
        Self {
            humidity,
            calls: Vec::new(),
        }
    }

    pub fn pulses_of(&self, wanted: Actuator) -> Vec<u64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActuatorCall::Pulse { actuator, secs } if *actuator == wanted => Some(*secs),
                _ => None,
            })
            .collect()
    }
}

impl SoilSensorPort for MockHardware {
    fn sample(&mut self) -> f32 {
        self.humidity
    }
}

impl ActuatorPort for MockHardware {
    fn pulse(&mut self, actuator: Actuator, duration: Duration) {
        self.calls.push(ActuatorCall::Pulse {
            actuator,
            secs: duration.as_secs(),
        });
    }

    fn pause(&mut self, duration: Duration) {
        self.calls.push(ActuatorCall::Pause {
            secs: duration.as_secs(),
        });
    }
}

// ── MockStore ─────────────────────────────────────────────────

pub struct MockStore {
    pub stored: Option<WakeupState>,
    /// Forced load outcome; `None` means "serve `stored`".
    pub load_error: Option<StateError>,
    /// How many upcoming saves fail.
    pub fail_saves: u32,
    pub save_count: u32,
    journal: Option<Journal>,
}

impl MockStore {
    pub fn empty() -> Self {
        Self {
            stored: None,
            load_error: None,
            fail_saves: 0,
            save_count: 0,
            journal: None,
        }
    }

    pub fn with_state(state: WakeupState) -> Self {
        Self {
            stored: Some(state),
            ..Self::empty()
        }
    }

    pub fn with_journal(mut self, journal: &Journal) -> Self {
        self.journal = Some(Rc::clone(journal));
        self
    }
}

impl StatePort for MockStore {
    fn load(&mut self) -> Result<WakeupState, StateError> {
        if let Some(e) = self.load_error {
            return Err(e);
        }
        self.stored.ok_or(StateError::Absent)
    }

    fn save(&mut self, state: &WakeupState) -> Result<(), StateError> {
        if self.fail_saves > 0 {
            self.fail_saves -= 1;
            return Err(StateError::IoError);
        }
        self.stored = Some(*state);
        self.save_count += 1;
        if let Some(j) = &self.journal {
            j.borrow_mut().push("save");
        }
        Ok(())
    }
}

// ── MockReporter ──────────────────────────────────────────────

pub struct MockReporter {
    pub fail_connect: bool,
    pub fail_report: bool,
    pub delivered: Vec<StatusReport>,
    journal: Option<Journal>,
}

impl MockReporter {
    pub fn working() -> Self {
        Self {
            fail_connect: false,
            fail_report: false,
            delivered: Vec::new(),
            journal: None,
        }
    }

    pub fn with_journal(mut self, journal: &Journal) -> Self {
        self.journal = Some(Rc::clone(journal));
        self
    }
}

impl ReporterPort for MockReporter {
    fn connect(&mut self) -> Result<(), ReportError> {
        if let Some(j) = &self.journal {
            j.borrow_mut().push("connect");
        }
        if self.fail_connect {
            return Err(ReportError::ConnectFailed);
        }
        Ok(())
    }

    fn report(&mut self, record: &StatusReport) -> Result<(), ReportError> {
        if self.fail_report {
            return Err(ReportError::RequestFailed);
        }
        self.delivered.push(*record);
        if let Some(j) = &self.journal {
            j.borrow_mut().push("report");
        }
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<CycleEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn contains(&self, wanted: &CycleEvent) -> bool {
        self.events.iter().any(|e| e == wanted)
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &CycleEvent) {
        self.events.push(*event);
    }
}
