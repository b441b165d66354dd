//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`] for network connectivity, including the
//! ICMP round-trip ping used by `/status`.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via
//!   `esp_idf_svc::wifi::BlockingWifi`, ping via `esp_idf_svc::ping`.
//! - **all other targets**: controllable simulation link for host tests.
//!
//! ## Reconnection policy
//!
//! Only the boot-time `connect()` blocks. Afterwards every `poll()` makes
//! at most one non-blocking reconnect attempt; between attempts the
//! adapter waits an exponential number of polls (100 → 200 → 400 …
//! capped at 6000).

use core::fmt;
use log::{error, info, warn};

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{
    AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi,
};

use crate::app::ports::ConnectivityPort;
use crate::error::CommsError;

use super::utils::is_printable_ascii;

// ───────────────────────────────────────────────────────────────
// Credential validation
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    InvalidSsid,
    InvalidPassword,
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
        }
    }
}

fn validate_ssid(ssid: &str) -> Result<(), CredentialError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(CredentialError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), CredentialError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(CredentialError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connected,
    Reconnecting { attempt: u32, wait_polls: u32 },
}

const INITIAL_BACKOFF_POLLS: u32 = 100;
const MAX_BACKOFF_POLLS: u32 = 6000;

#[cfg(target_os = "espidf")]
const PING_TIMEOUT_MS: u64 = 1000;

/// Host-side stand-in for the radio.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
struct SimLink {
    up: bool,
    refuse: bool,
    latency_ms: Option<u32>,
    reconnect_calls: u32,
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    ping_host: [u8; 4],
    backoff_polls: u32,
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    #[cfg(not(target_os = "espidf"))]
    sim: SimLink,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(wifi: BlockingWifi<EspWifi<'static>>, ping_host: [u8; 4]) -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            ping_host,
            backoff_polls: INITIAL_BACKOFF_POLLS,
            wifi,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(ping_host: [u8; 4]) -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            ping_host,
            backoff_polls: INITIAL_BACKOFF_POLLS,
            sim: SimLink {
                latency_ms: Some(20),
                ..SimLink::default()
            },
        }
    }

    pub fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), CredentialError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid.push_str(ssid).map_err(|()| CredentialError::InvalidSsid)?;
        self.password.clear();
        self.password
            .push_str(password)
            .map_err(|()| CredentialError::InvalidPassword)?;
        info!("WiFi: credentials updated (SSID='{}')", self.ssid);
        Ok(())
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    fn mark_connected(&mut self) {
        self.state = WifiState::Connected;
        self.backoff_polls = INITIAL_BACKOFF_POLLS;
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), CommsError> {
        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let config = Configuration::Client(ClientConfiguration {
            ssid: self.ssid.clone(),
            password: self.password.clone(),
            auth_method,
            ..Default::default()
        });
        let result = self
            .wifi
            .set_configuration(&config)
            .and_then(|()| self.wifi.start())
            .and_then(|()| self.wifi.connect())
            .and_then(|()| self.wifi.wait_netif_up());
        result.map_err(|e| {
            error!("WiFi(espidf): connect failed: {}", e);
            CommsError::ConnectFailed
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), CommsError> {
        if self.sim.refuse {
            return Err(CommsError::ConnectFailed);
        }
        self.sim.up = true;
        Ok(())
    }

    /// Fire a reconnect request without waiting for the association.
    #[cfg(target_os = "espidf")]
    fn platform_begin_reconnect(&mut self) {
        if let Err(e) = self.wifi.wifi_mut().connect() {
            warn!("WiFi(espidf): reconnect request failed: {}", e);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_begin_reconnect(&mut self) {
        self.sim.reconnect_calls += 1;
        if !self.sim.refuse {
            self.sim.up = true;
        }
    }

    #[cfg(target_os = "espidf")]
    fn platform_link_up(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_link_up(&self) -> bool {
        self.sim.up
    }

    #[cfg(target_os = "espidf")]
    fn platform_ping(&mut self) -> Option<u32> {
        use esp_idf_svc::ipv4::Ipv4Addr;
        use esp_idf_svc::ping::{Configuration as PingConfiguration, EspPing};

        let [a, b, c, d] = self.ping_host;
        let conf = PingConfiguration {
            count: 1,
            timeout: core::time::Duration::from_millis(PING_TIMEOUT_MS),
            ..Default::default()
        };
        match EspPing::default().ping(Ipv4Addr::new(a, b, c, d), &conf) {
            Ok(summary) if summary.received > 0 => Some(summary.time.as_millis() as u32),
            Ok(_) => None,
            Err(e) => {
                warn!("WiFi(espidf): ping failed: {}", e);
                None
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_ping(&mut self) -> Option<u32> {
        log::debug!("WiFi(sim): ping {:?}", self.ping_host);
        self.sim.latency_ms
    }

    // ── Simulation controls ───────────────────────────────────

    /// Drop (`false`) or restore (`true`) the simulated link. While the
    /// link is down, connect and reconnect attempts are refused.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_link(&mut self, up: bool) {
        self.sim.up = up;
        self.sim.refuse = !up;
    }

    /// Refuse connection attempts without touching the current link.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_refuse_connects(&mut self, refuse: bool) {
        self.sim.refuse = refuse;
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_latency(&mut self, latency_ms: Option<u32>) {
        self.sim.latency_ms = latency_ms;
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_reconnect_calls(&self) -> u32 {
        self.sim.reconnect_calls
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn connect(&mut self) -> Result<(), CommsError> {
        if self.ssid.is_empty() {
            error!("WiFi: no credentials configured");
            return Err(CommsError::ConnectFailed);
        }
        if self.state == WifiState::Connected {
            return Ok(());
        }

        info!("WiFi: connecting to '{}'", self.ssid);
        match self.platform_connect() {
            Ok(()) => {
                self.mark_connected();
                info!("WiFi: connected");
                Ok(())
            }
            Err(e) => {
                error!("WiFi: connection failed — {}", e);
                self.state = WifiState::Reconnecting {
                    attempt: 0,
                    wait_polls: self.backoff_polls,
                };
                Err(e)
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.state == WifiState::Connected
    }

    fn poll(&mut self) {
        match self.state {
            WifiState::Connected => {
                if !self.platform_link_up() {
                    warn!("WiFi: connection lost, entering reconnect");
                    self.state = WifiState::Reconnecting {
                        attempt: 0,
                        wait_polls: 0,
                    };
                }
            }
            WifiState::Reconnecting { attempt, wait_polls } => {
                if self.platform_link_up() {
                    self.mark_connected();
                    info!("WiFi: reconnected after {} attempt(s)", attempt);
                } else if wait_polls > 0 {
                    self.state = WifiState::Reconnecting {
                        attempt,
                        wait_polls: wait_polls - 1,
                    };
                } else {
                    info!("WiFi: reconnect attempt {} (next wait {} polls)", attempt + 1, self.backoff_polls);
                    self.platform_begin_reconnect();
                    self.state = WifiState::Reconnecting {
                        attempt: attempt + 1,
                        wait_polls: self.backoff_polls,
                    };
                    self.backoff_polls = (self.backoff_polls * 2).min(MAX_BACKOFF_POLLS);
                }
            }
            WifiState::Disconnected => {}
        }
    }

    fn ping_latency_ms(&mut self) -> Option<u32> {
        if !self.is_connected() {
            warn!("WiFi: ping skipped ({})", CommsError::Disconnected);
            return None;
        }
        let rtt = self.platform_ping();
        if rtt.is_none() {
            warn!("WiFi: {}", CommsError::PingFailed);
        }
        rtt
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
