//! DripWake Firmware — Main Entry Point
//!
//! One wakeup cycle per boot, then deep sleep.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  HardwareAdapter     RtcStateStore    NetReporter        │
//! │  (Sensor+Actuator)   (StatePort)      (ReporterPort)     │
//! │  LogEventSink                                            │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ──────────────      │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │          WakeupService (pure logic)            │      │
//! │  │  counters · postponement · persistence order   │      │
//! │  └────────────────────────────────────────────────┘      │
//! │                                                          │
//! │  power::deep_sleep — the unconditional last step         │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use core::time::Duration;

use anyhow::Result;
use log::{info, warn};

use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use dripwake::adapters::hardware::HardwareAdapter;
use dripwake::adapters::log_sink::LogEventSink;
use dripwake::adapters::reporter::NetReporter;
use dripwake::adapters::rtc_store::RtcStateStore;
use dripwake::adapters::time::SysDelay;
use dripwake::adapters::wifi::WifiAdapter;
use dripwake::app::service::WakeupService;
use dripwake::config::Config;
use dripwake::drivers::hw_init;
use dripwake::power;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("DripWake v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::default();
    config.validate().map_err(anyhow::Error::msg)?;

    // Boot hold-off: gives a serial operator a window to interrupt
    // before any relay moves (and keeps reflashing painless).
    std::thread::sleep(Duration::from_secs(config.boot_delay_secs.into()));

    info!("wake cause: {:?}", power::wake_cause());

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Without working GPIO there is nothing useful to do this
        // cycle; sleep one interval and hope the fault is transient.
        log::error!("HAL init failed: {} — sleeping one interval", e);
        power::deep_sleep(Duration::from_millis(config.wakeup_interval_ms));
    }

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // ── 3. Adapters ───────────────────────────────────────────
    let mut store = RtcStateStore::new();
    let mut hw = HardwareAdapter::new(&config, SysDelay::new());
    let mut sink = LogEventSink::new();

    // A controller that cannot reach the network still waters.
    let wifi = match WifiAdapter::new(peripherals.modem, sysloop, nvs, config.network.clone()) {
        Ok(wifi) => Some(wifi),
        Err(e) => {
            warn!("wifi unavailable ({}), reports disabled this cycle", e);
            None
        }
    };
    let report_url = config.network.report_url.clone();
    let mut reporter = NetReporter::new(wifi, report_url.as_str());

    // ── 4. One wakeup cycle, then sleep ───────────────────────
    let service = WakeupService::new(config);
    let sleep_for = service.run_cycle(&mut store, &mut hw, &mut reporter, &mut sink);

    // Unconditional: nothing between the cycle and this call can fail.
    power::deep_sleep(sleep_for)
}
