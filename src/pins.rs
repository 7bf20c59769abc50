//! GPIO / peripheral pin assignments for the DripWake controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Relay outputs (active-low trigger boards)
// ---------------------------------------------------------------------------

/// Water pump relay coil.  LOW energises the relay, HIGH is idle.
pub const PUMP_RELAY_GPIO: i32 = 2;
/// Orchid nebuliser relay coil, same active-low wiring.
pub const MIST_RELAY_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Capacitive soil-moisture probe — analog voltage via resistive divider.
/// ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const MOISTURE_ADC_GPIO: i32 = 1;
/// ADC1 channel for the moisture probe.
pub const ADC1_CH_MOISTURE: u32 = 0;
