//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the moisture probe and both relay drivers, exposing them through
//! [`SoilSensorPort`] and [`ActuatorPort`].  Pulse timing goes through an
//! injected [`DelayNs`] so host tests never block for real.

use core::time::Duration;

use embedded_hal::delay::DelayNs;

use crate::app::ports::{Actuator, ActuatorPort, SoilSensorPort};
use crate::config::Config;
use crate::drivers::relay::RelayDriver;
use crate::pins;
use crate::sensors::moisture::MoistureSensor;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<D> {
    moisture: MoistureSensor,
    pump: RelayDriver,
    mist: RelayDriver,
    delay: D,
}

impl<D: DelayNs> HardwareAdapter<D> {
    pub fn new(config: &Config, delay: D) -> Self {
        Self {
            moisture: MoistureSensor::new(config.calibration, config.sample_count),
            pump: RelayDriver::new(pins::PUMP_RELAY_GPIO),
            mist: RelayDriver::new(pins::MIST_RELAY_GPIO),
            delay,
        }
    }
}

// ── SoilSensorPort implementation ─────────────────────────────

impl<D: DelayNs> SoilSensorPort for HardwareAdapter<D> {
    fn sample(&mut self) -> f32 {
        self.moisture.sample()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<D: DelayNs> ActuatorPort for HardwareAdapter<D> {
    fn pulse(&mut self, actuator: Actuator, duration: Duration) {
        let relay = match actuator {
            Actuator::Pump => &mut self.pump,
            Actuator::Mist => &mut self.mist,
        };
        relay.energise();
        self.delay.delay_ms(duration.as_millis() as u32);
        relay.release();
    }

    fn pause(&mut self, duration: Duration) {
        self.delay.delay_ms(duration.as_millis() as u32);
    }
}
