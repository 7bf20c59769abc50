//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ WakeupService (domain)
//! ```
//!
//! Driven adapters (probe, relays, state store, reporter, event sink)
//! implement these traits.  The [`WakeupService`](super::service::WakeupService)
//! consumes them via generics, so the decision core never touches
//! hardware directly.

use core::time::Duration;

use crate::state::WakeupState;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain soil humidity.
pub trait SoilSensorPort {
    /// Averaged, calibrated relative-humidity percentage.
    ///
    /// Infallible by contract: a faulty probe yields an out-of-range
    /// value, which the threshold comparison handles like dry soil.
    fn sample(&mut self) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Relay outputs on the controller board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actuator {
    Pump,
    Mist,
}

/// Write-side port: active-low relay pulses.
///
/// Pulses block the (single) execution path and are issued strictly
/// sequentially; there is no concurrent actuation in this system.
pub trait ActuatorPort {
    /// Energise `actuator` for `duration`, then restore the idle level.
    /// The idle level is restored even for a zero duration.
    fn pulse(&mut self, actuator: Actuator, duration: Duration);

    /// Block the cycle for `duration` (e.g. the inter-pulse pause).
    fn pause(&mut self, duration: Duration);
}

// ───────────────────────────────────────────────────────────────
// State store port (driven adapter: domain ↔ RTC memory)
// ───────────────────────────────────────────────────────────────

/// Persistent store for [`WakeupState`] across deep sleep.
///
/// Load failures are policy, not faults: the scheduler maps every
/// [`StateError`] to cold-boot defaults.  `save` must be idempotent and
/// its effect must survive the imminent sleep transition.
pub trait StatePort {
    fn load(&mut self) -> Result<WakeupState, StateError>;
    fn save(&mut self, state: &WakeupState) -> Result<(), StateError>;
}

/// Errors from [`StatePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// Backing memory holds no blob (first boot or power loss).
    Absent,
    /// Blob present but failed magic/version/decode checks.
    Corrupted,
    /// Backing memory could not be read or written.
    IoError,
}

impl core::fmt::Display for StateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Absent => write!(f, "no stored state"),
            Self::Corrupted => write!(f, "stored state corrupted"),
            Self::IoError => write!(f, "state memory I/O error"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Reporter port (driven adapter: domain → network)
// ───────────────────────────────────────────────────────────────

/// Best-effort outbound status delivery.
///
/// Both operations are advisory; the wakeup cycle proceeds to sleep
/// whatever they return.
pub trait ReporterPort {
    /// Bring the network up.  Bounded retries happen inside the adapter;
    /// this returns the first success or the final failure.
    fn connect(&mut self) -> Result<(), ReportError>;

    /// Deliver one status record.  No retry.
    fn report(&mut self, record: &super::events::StatusReport) -> Result<(), ReportError>;
}

/// Errors from [`ReporterPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportError {
    /// No station credentials configured.
    NoCredentials,
    /// SSID or password failed validation.
    InvalidCredentials,
    /// The network stack was not brought up at boot.
    Unavailable,
    /// Association did not complete within the attempt budget.
    ConnectFailed,
    /// The status request itself failed (transport or non-2xx).
    RequestFailed,
}

impl core::fmt::Display for ReportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidCredentials => write!(f, "WiFi credentials invalid"),
            Self::Unavailable => write!(f, "network stack unavailable"),
            Self::ConnectFailed => write!(f, "WiFi association failed"),
            Self::RequestFailed => write!(f, "status request failed"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`CycleEvent`](super::events::CycleEvent)s
/// through this port.  Adapters decide where they go (serial log today;
/// a display or MQTT sink would implement the same trait).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::CycleEvent);
}
