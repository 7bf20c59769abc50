//! Blocking delay adapter.
//!
//! Implements the `embedded-hal` [`DelayNs`] trait over the std sleep —
//! on ESP-IDF this delegates to FreeRTOS `vTaskDelay`, on the host it
//! suspends the calling thread.  Tests that must not block inject a
//! recording `DelayNs` instead.

use embedded_hal::delay::DelayNs;

/// Thread-blocking delay for the single execution path.
pub struct SysDelay;

impl SysDelay {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SysDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayNs for SysDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns.into()));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(ms.into()));
    }
}
