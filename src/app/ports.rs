//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (clock, gas sensor, indicators, chat transport, network)
//! implement these traits. The [`AppService`](super::service::AppService)
//! and the lifecycle controller consume them via generics, so the domain
//! core never touches hardware directly.

use crate::error::{CommsError, SensorError};

use super::events::Notification;

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond time source.
pub trait Clock {
    /// Milliseconds since boot. Never decreases.
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain gas readings.
pub trait SensorPort {
    /// One raw reading in `0..=MAX_RANGE`.
    fn read_gas(&mut self) -> Result<u16, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive the indicators.
pub trait ActuatorPort {
    /// Drive the visual alert line.
    fn set_alert_led(&mut self, on: bool);

    /// Current level of the visual alert line.
    fn alert_led(&self) -> bool;

    /// Drive the status-pulse line.
    fn set_status_led(&mut self, on: bool);

    /// Current level of the status-pulse line.
    fn status_led(&self) -> bool;

    /// Start (`true`) or silence (`false`) the alert tone.
    fn set_buzzer(&mut self, on: bool);

    /// Fire-and-forget tone that stops by itself after `duration_ms`.
    fn beep(&mut self, duration_ms: u32);

    /// Every output off.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Command channel (driving adapter: chat transport → domain)
// ───────────────────────────────────────────────────────────────

/// A text message received from the remote chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Sender identity as reported by the transport (chat id).
    pub sender: heapless::String<32>,
    /// Raw message body.
    pub text: heapless::String<128>,
}

impl InboundMessage {
    /// Build a message, truncating fields that exceed their capacity.
    pub fn new(sender: &str, text: &str) -> Self {
        Self {
            sender: truncated(sender),
            text: truncated(text),
        }
    }
}

fn truncated<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Non-blocking source of inbound messages.
pub trait CommandChannel {
    /// Next pending message, or `None` when the inbox is empty.
    fn poll(&mut self) -> Option<InboundMessage>;
}

// ───────────────────────────────────────────────────────────────
// Notification sink (driven adapter: domain → chat / log)
// ───────────────────────────────────────────────────────────────

/// Best-effort outbound notifications. Failures are reported but the
/// domain never retries them.
pub trait NotificationSink {
    fn notify(&mut self, notification: &Notification) -> Result<(), CommsError>;
}

/// Fan-out: deliver to both sinks. The first error (if any) is returned
/// after both have been tried.
impl<A: NotificationSink, B: NotificationSink> NotificationSink for (A, B) {
    fn notify(&mut self, notification: &Notification) -> Result<(), CommsError> {
        let first = self.0.notify(notification);
        let second = self.1.notify(notification);
        first.and(second)
    }
}

// ───────────────────────────────────────────────────────────────
// Connectivity port (driven adapter: domain ↔ network)
// ───────────────────────────────────────────────────────────────

pub trait ConnectivityPort {
    /// Join the network. Called once at boot; failure is fatal there.
    fn connect(&mut self) -> Result<(), CommsError>;

    fn is_connected(&self) -> bool;

    /// Non-blocking upkeep; at most one reconnect attempt per call.
    fn poll(&mut self);

    /// Round-trip time to the reference host, `None` on failure.
    /// The only bounded blocking call in the system.
    fn ping_latency_ms(&mut self) -> Option<u32>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from loading or validating [`SystemConfig`](crate::config::SystemConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Override document failed to deserialize.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
