//! Status reporter adapter.
//!
//! Implements [`ReporterPort`]: one WiFi association (bounded retries
//! inside [`WifiAdapter`]) followed by a single HTTP GET carrying the
//! cycle's counters and humidity as query parameters.  Everything here
//! is advisory — the wakeup cycle sleeps on schedule whatever happens.

use core::fmt::Write as _;

use log::{info, warn};

use crate::app::events::StatusReport;
use crate::app::ports::{ReportError, ReporterPort};

use super::wifi::WifiAdapter;

/// Base URL (128) plus query string headroom.
const URL_CAP: usize = 192;

pub struct NetReporter {
    /// `None` when the network stack could not be brought up at boot —
    /// the controller still waters, it just stays silent.
    wifi: Option<WifiAdapter>,
    base_url: heapless::String<128>,
    #[cfg(not(target_os = "espidf"))]
    sim_fail_requests: bool,
    #[cfg(not(target_os = "espidf"))]
    sim_sent: Vec<heapless::String<URL_CAP>>,
}

impl NetReporter {
    pub fn new(wifi: Option<WifiAdapter>, report_url: &str) -> Self {
        Self {
            wifi,
            base_url: heapless::String::try_from(report_url).unwrap_or_default(),
            #[cfg(not(target_os = "espidf"))]
            sim_fail_requests: false,
            #[cfg(not(target_os = "espidf"))]
            sim_sent: Vec::new(),
        }
    }

    fn build_url(&self, r: &StatusReport) -> Result<heapless::String<URL_CAP>, ReportError> {
        let mut url: heapless::String<URL_CAP> = heapless::String::new();
        write!(
            url,
            "{}?pump={}&mist={}&postponed={}&humidity={:.1}",
            self.base_url,
            r.pump_cycles_remaining,
            r.mist_cycles_remaining,
            r.pump_postponements,
            r.humidity_percent,
        )
        .map_err(|_| ReportError::RequestFailed)?;
        Ok(url)
    }

    #[cfg(target_os = "espidf")]
    fn send(&mut self, url: &str) -> Result<(), ReportError> {
        use embedded_svc::http::{Method, Status, client::Client};
        use esp_idf_svc::http::client::{Configuration, EspHttpConnection};

        let conn = EspHttpConnection::new(&Configuration {
            timeout: Some(std::time::Duration::from_secs(10)),
            ..Default::default()
        })
        .map_err(|_| ReportError::RequestFailed)?;
        let mut client = Client::wrap(conn);

        let request = client
            .request(Method::Get, url, &[])
            .map_err(|_| ReportError::RequestFailed)?;
        let response = request.submit().map_err(|_| ReportError::RequestFailed)?;

        let status = response.status();
        if !(200..300).contains(&status) {
            warn!("reporter: endpoint returned HTTP {}", status);
            return Err(ReportError::RequestFailed);
        }
        info!("reporter: delivered (HTTP {})", status);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn send(&mut self, url: &str) -> Result<(), ReportError> {
        if self.sim_fail_requests {
            warn!("reporter(sim): simulated request failure");
            return Err(ReportError::RequestFailed);
        }
        self.sim_sent
            .push(heapless::String::try_from(url).map_err(|_| ReportError::RequestFailed)?);
        info!("reporter(sim): GET {}", url);
        Ok(())
    }

    /// Make every subsequent request fail (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_requests(&mut self, fail: bool) {
        self.sim_fail_requests = fail;
    }

    /// URLs delivered so far (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_sent(&self) -> &[heapless::String<URL_CAP>] {
        &self.sim_sent
    }
}

impl ReporterPort for NetReporter {
    fn connect(&mut self) -> Result<(), ReportError> {
        match self.wifi.as_mut() {
            Some(wifi) => wifi.connect(),
            None => Err(ReportError::Unavailable),
        }
    }

    fn report(&mut self, record: &StatusReport) -> Result<(), ReportError> {
        let url = self.build_url(record)?;
        self.send(url.as_str())
    }
}
