//! WiFi station-mode adapter.
//!
//! Brings the station interface up with fixed credentials and a static
//! IPv4 assignment — the garden network runs no DHCP server.  Association
//! is attempted a bounded number of times with a fixed pause between
//! attempts; the caller treats any failure as advisory and the cycle
//! sleeps on schedule either way.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via
//!   `esp_idf_svc::wifi`, static IP applied by swapping the STA netif.
//! - **all other targets**: simulation with deterministic failure
//!   injection for host-side tests.

use log::{info, warn};

use crate::app::ports::ReportError;
use crate::config::NetworkConfig;

#[cfg(target_os = "espidf")]
use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};
#[cfg(target_os = "espidf")]
use esp_idf_hal::modem::Modem;
#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    ipv4::{
        ClientConfiguration as IpClientConfiguration, ClientSettings as IpClientSettings,
        Configuration as IpConfiguration, Mask, Subnet,
    },
    netif::{EspNetif, NetifConfiguration},
    nvs::EspDefaultNvsPartition,
    wifi::{BlockingWifi, EspWifi},
};

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connected,
    Failed,
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_credentials(net: &NetworkConfig) -> Result<(), ReportError> {
    if !net.ssid.is_empty() && !is_printable_ascii(&net.ssid) {
        return Err(ReportError::InvalidCredentials);
    }
    // WPA2 wants 8–64 bytes; empty means an open network.
    if !net.password.is_empty() && net.password.len() < 8 {
        return Err(ReportError::InvalidCredentials);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    net: NetworkConfig,
    state: WifiState,
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    /// Simulation: how many upcoming association attempts fail.
    #[cfg(not(target_os = "espidf"))]
    sim_fail_connects: u32,
}

impl WifiAdapter {
    /// Create the adapter and start the station interface.
    ///
    /// Fails fast on invalid or missing credentials so `main()` can run
    /// the watering cycle with reporting disabled instead of aborting.
    #[cfg(target_os = "espidf")]
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
        net: NetworkConfig,
    ) -> Result<Self, ReportError> {
        validate_credentials(&net)?;
        if net.ssid.is_empty() {
            return Err(ReportError::NoCredentials);
        }

        let mut esp_wifi =
            EspWifi::new(modem, sysloop.clone(), Some(nvs)).map_err(|_| ReportError::Unavailable)?;

        let netif = EspNetif::new_with_conf(&static_netif_conf(&net)?)
            .map_err(|_| ReportError::Unavailable)?;
        esp_wifi
            .swap_netif_sta(netif)
            .map_err(|_| ReportError::Unavailable)?;

        let mut wifi =
            BlockingWifi::wrap(esp_wifi, sysloop).map_err(|_| ReportError::Unavailable)?;

        let auth_method = if net.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: net.ssid.clone(),
            password: net.password.clone(),
            auth_method,
            ..Default::default()
        }))
        .map_err(|_| ReportError::Unavailable)?;
        wifi.start().map_err(|_| ReportError::Unavailable)?;

        info!("wifi: station started (SSID='{}', static IP)", net.ssid);
        Ok(Self {
            net,
            state: WifiState::Disconnected,
            wifi,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(net: NetworkConfig) -> Result<Self, ReportError> {
        validate_credentials(&net)?;
        info!("wifi(sim): station adapter ready (SSID='{}')", net.ssid);
        Ok(Self {
            net,
            state: WifiState::Disconnected,
            sim_fail_connects: 0,
        })
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    /// Associate with the access point.
    ///
    /// Bounded: `connect_attempts` tries with a fixed
    /// `connect_retry_secs` pause between them, then give up for this
    /// cycle.  Idempotent once connected.
    pub fn connect(&mut self) -> Result<(), ReportError> {
        if self.net.ssid.is_empty() {
            return Err(ReportError::NoCredentials);
        }
        if self.state == WifiState::Connected {
            return Ok(());
        }

        let attempts = self.net.connect_attempts.max(1);
        for attempt in 1..=attempts {
            info!("wifi: associate attempt {}/{}", attempt, attempts);
            if self.platform_connect().is_ok() {
                self.state = WifiState::Connected;
                info!("wifi: connected");
                return Ok(());
            }
            if attempt < attempts {
                std::thread::sleep(std::time::Duration::from_secs(
                    self.net.connect_retry_secs.into(),
                ));
            }
        }

        self.state = WifiState::Failed;
        warn!("wifi: giving up after {} attempts", attempts);
        Err(ReportError::ConnectFailed)
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), ()> {
        self.wifi.connect().map_err(|e| {
            warn!("wifi: connect error {:?}", e);
        })?;
        self.wifi.wait_netif_up().map_err(|e| {
            warn!("wifi: netif up error {:?}", e);
        })?;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), ()> {
        if self.sim_fail_connects > 0 {
            self.sim_fail_connects -= 1;
            warn!("wifi(sim): simulated association failure");
            return Err(());
        }
        info!("wifi(sim): associated with '{}'", self.net.ssid);
        Ok(())
    }

    /// Make the next `n` association attempts fail deterministically.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_next_connects(&mut self, n: u32) {
        self.sim_fail_connects = n;
    }
}

#[cfg(target_os = "espidf")]
fn static_netif_conf(net: &NetworkConfig) -> Result<NetifConfiguration, ReportError> {
    let mask =
        Mask::try_from(ipv4(net.subnet_mask)).map_err(|_| ReportError::InvalidCredentials)?;
    let mut conf = NetifConfiguration::wifi_default_client();
    conf.key = heapless::String::try_from("sta_static").unwrap_or_default();
    conf.ip_configuration = Some(IpConfiguration::Client(IpClientConfiguration::Fixed(
        IpClientSettings {
            ip: ipv4(net.static_ip),
            subnet: Subnet {
                gateway: ipv4(net.gateway),
                mask,
            },
            dns: Some(ipv4(net.dns)),
            secondary_dns: None,
        },
    )));
    Ok(conf)
}

#[cfg(target_os = "espidf")]
fn ipv4(octets: [u8; 4]) -> std::net::Ipv4Addr {
    std::net::Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3])
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
