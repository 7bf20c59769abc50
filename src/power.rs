//! Deep-sleep entry and wake-cause query.
//!
//! The controller spends almost all of its life asleep; [`deep_sleep`]
//! is the final, unconditional step of every wakeup cycle.

use core::time::Duration;

use log::info;

/// Why the chip came out of reset, as far as the cycle cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeCause {
    /// Timer wakeup from deep sleep — the normal hourly cycle.
    Timer,
    /// Anything else: first power-on, brownout, panic reset.  The RTC
    /// blob is not expected to be intact on this path.
    Other,
}

/// Query the wakeup cause.  Logged at boot for diagnosis; the state
/// restore itself is driven purely by the blob's validity.
#[cfg(target_os = "espidf")]
pub fn wake_cause() -> WakeCause {
    // SAFETY: esp_sleep_get_wakeup_cause is a read-only query.
    let cause = unsafe { esp_idf_svc::sys::esp_sleep_get_wakeup_cause() };
    if cause == esp_idf_svc::sys::esp_sleep_source_t_ESP_SLEEP_WAKEUP_TIMER {
        WakeCause::Timer
    } else {
        WakeCause::Other
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn wake_cause() -> WakeCause {
    WakeCause::Other
}

/// Arm the wake timer and enter deep sleep.  Never returns.
pub fn deep_sleep(duration: Duration) -> ! {
    info!("entering deep sleep for {} s", duration.as_secs());

    #[cfg(target_os = "espidf")]
    {
        // SAFETY: single-threaded shutdown path; esp_deep_sleep powers
        // the core down and does not return.
        unsafe {
            esp_idf_svc::sys::esp_deep_sleep(duration.as_micros() as u64);
        }
        unreachable!("esp_deep_sleep returned");
    }

    #[cfg(not(target_os = "espidf"))]
    {
        info!("deep sleep (sim): exiting process");
        std::process::exit(0);
    }
}
