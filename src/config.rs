//! Controller configuration
//!
//! All tunable parameters for the DripWake controller: the watering
//! policy, actuation timings, probe calibration, and the fixed network
//! setup.  Values are compiled in; `validate()` catches nonsensical
//! combinations before the first cycle runs.

use serde::{Deserialize, Serialize};

/// Two-point linear calibration for the soil-moisture probe.
///
/// The probe reads *lower* raw values the wetter the soil is, so the
/// derived slope is negative.  A misbehaving probe simply produces a
/// percentage outside 0–100; nothing here can fail.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Calibration {
    /// Raw ADC value with the probe fully submerged.
    pub raw_saturated: u16,
    /// Humidity percent reported at `raw_saturated`.
    pub percent_saturated: f32,
    /// Raw ADC value with the probe in dry soil.
    pub raw_dry: u16,
    /// Humidity percent reported at `raw_dry`.
    pub percent_dry: f32,
}

impl Default for Calibration {
    fn default() -> Self {
        // Anchors measured against the reference probe batch.
        Self {
            raw_saturated: 297,
            percent_saturated: 100.0,
            raw_dry: 378,
            percent_dry: 40.0,
        }
    }
}

/// Fixed station credentials and static IPv4 assignment — the garden
/// network runs no DHCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub ssid: heapless::String<32>,
    pub password: heapless::String<64>,
    pub static_ip: [u8; 4],
    pub subnet_mask: [u8; 4],
    pub gateway: [u8; 4],
    pub dns: [u8; 4],
    /// Base URL of the status endpoint; query parameters are appended.
    pub report_url: heapless::String<128>,
    /// Association attempts before the cycle gives up on reporting.
    pub connect_attempts: u8,
    /// Fixed pause between association attempts (seconds).
    pub connect_retry_secs: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            static_ip: [192, 168, 1, 77],
            subnet_mask: [255, 255, 255, 0],
            gateway: [192, 168, 1, 1],
            dns: [192, 168, 1, 3],
            report_url: heapless::String::try_from("http://192.168.1.3/dripwake")
                .unwrap_or_default(),
            connect_attempts: 5,
            connect_retry_secs: 2,
        }
    }
}

/// Core controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // --- Watering policy ---
    /// Soil humidity (%) at or above which an eligible pump run is skipped.
    pub humidity_threshold_percent: f32,
    /// Wakeups between pump runs (hourly wakeups; 144 = 6 days).
    pub pump_period_wakeups: i32,
    /// Wakeups between nebuliser runs (12 = twice a day).
    pub mist_period_wakeups: i32,
    /// Short re-check interval after a skipped pump run (24 = 1 day).
    pub postpone_period_wakeups: i32,
    /// Consecutive skips allowed before the pump fires regardless of humidity.
    pub postpone_cap: u8,

    // --- Actuation ---
    /// Duration of a single pump pulse (seconds).
    pub pump_pulse_secs: u32,
    /// Pulses per pump trigger.
    pub pump_pulse_count: u8,
    /// Pause between pulses within one trigger (seconds).
    pub pump_inter_pulse_secs: u32,
    /// Duration of a nebuliser run (seconds).
    pub mist_pulse_secs: u32,

    // --- Sampling ---
    /// Raw ADC reads averaged per humidity sample.
    pub sample_count: u16,
    pub calibration: Calibration,

    // --- Timing ---
    /// Deep-sleep duration between wakeups (milliseconds).
    pub wakeup_interval_ms: u64,
    /// Boot hold-off before any action, for operator intervention (seconds).
    pub boot_delay_secs: u32,

    // --- Network ---
    pub network: NetworkConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Watering policy
            humidity_threshold_percent: 60.0,
            pump_period_wakeups: 6 * 24,
            mist_period_wakeups: 12,
            postpone_period_wakeups: 24,
            postpone_cap: 5,

            // Actuation
            pump_pulse_secs: 7,
            pump_pulse_count: 2,
            pump_inter_pulse_secs: 5 * 60,
            mist_pulse_secs: 135, // 2 min 15 s

            // Sampling
            sample_count: 100,
            calibration: Calibration::default(),

            // Timing
            wakeup_interval_ms: 3_600_000, // one hour
            boot_delay_secs: 3,

            // Network
            network: NetworkConfig::default(),
        }
    }
}

impl Config {
    /// Range-check every field combination the decision logic relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pump_period_wakeups <= 0 {
            return Err(ConfigError::Invalid("pump_period_wakeups must be > 0"));
        }
        if self.mist_period_wakeups <= 0 {
            return Err(ConfigError::Invalid("mist_period_wakeups must be > 0"));
        }
        if self.postpone_period_wakeups <= 0
            || self.postpone_period_wakeups >= self.pump_period_wakeups
        {
            return Err(ConfigError::Invalid(
                "postpone_period_wakeups must be > 0 and < pump_period_wakeups",
            ));
        }
        if self.postpone_cap == u8::MAX {
            return Err(ConfigError::Invalid("postpone_cap must be < 255"));
        }
        if !(0.0..=100.0).contains(&self.humidity_threshold_percent) {
            return Err(ConfigError::Invalid(
                "humidity_threshold_percent must be 0–100",
            ));
        }
        if self.pump_pulse_count == 0 {
            return Err(ConfigError::Invalid("pump_pulse_count must be > 0"));
        }
        if self.sample_count == 0 {
            return Err(ConfigError::Invalid("sample_count must be > 0"));
        }
        if self.calibration.raw_saturated == self.calibration.raw_dry {
            return Err(ConfigError::Invalid(
                "calibration anchors must use distinct raw values",
            ));
        }
        if self.wakeup_interval_ms == 0 {
            return Err(ConfigError::Invalid("wakeup_interval_ms must be > 0"));
        }
        if self.network.connect_attempts == 0 {
            return Err(ConfigError::Invalid("connect_attempts must be > 0"));
        }
        Ok(())
    }
}

/// Errors from [`Config::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation; the message names which and why.
    Invalid(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl core::error::Error for ConfigError {}
