//! Outbound notifications.
//!
//! The domain emits these through the
//! [`NotificationSink`](super::ports::NotificationSink) port. Adapters on
//! the other side decide where they go (chat transport, serial log).
//! The `Display` impl is the user-facing message text.

use core::fmt;

use log::{info, warn};

use crate::error::InitFault;

use super::ports::NotificationSink;

/// Messages the monitor sends to the remote user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Asks for the warmup duration at first boot.
    ProvisioningPrompt,
    /// Warmup duration accepted; warmup has started.
    ProvisioningAccepted { minutes: u32 },
    /// The reply did not carry a usable warmup duration.
    ProvisioningRejected,
    /// Warmup elapsed; the first calibration window is open.
    SensorReady,
    /// A calibration window closed into a new baseline.
    BaselineCalibrated { baseline: u16 },
    /// Periodic baseline refresh has started.
    Recalibrating,
    /// Leak alert (first one of an episode, or a repeat).
    LeakDetected {
        reading: u16,
        baseline: u16,
        threshold: u32,
    },
    /// Reading fell back to or below the threshold.
    Normalized,
    /// Reply to `/status`.
    Status(StatusReport),
    /// Reply to `/reset`, sent right before restarting.
    ResetAck,
    /// Boot check failed; the device is halted.
    Fault(InitFault),
}

/// Snapshot gathered for the `/status` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    /// Most recent monitoring reading, if any.
    pub latest: Option<u16>,
    /// Mean of the reading history (0 when empty).
    pub average: u16,
    /// Current baseline, once calibrated.
    pub baseline: Option<u16>,
    /// Alert threshold for the current baseline.
    pub threshold: Option<u32>,
    /// Round-trip ping result; `None` when the ping failed.
    pub latency_ms: Option<u32>,
    /// Whether a leak episode is in progress.
    pub alert_active: bool,
}

impl StatusReport {
    /// Latency as reported to the user: milliseconds, or `-1` on failure.
    pub fn latency_or_sentinel(&self) -> i64 {
        self.latency_ms.map_or(-1, i64::from)
    }
}

struct OrNa<T>(Option<T>);

impl<T: fmt::Display> fmt::Display for OrNa<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(v) => write!(f, "{v}"),
            None => write!(f, "n/a"),
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Status\nreading: {}\naverage: {}\nbaseline: {}\nthreshold: {}\nping: {} ms\nalert: {}",
            OrNa(self.latest),
            self.average,
            OrNa(self.baseline),
            OrNa(self.threshold),
            self.latency_or_sentinel(),
            if self.alert_active { "ACTIVE" } else { "clear" },
        )
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProvisioningPrompt => write!(f, "Send the sensor warmup time in minutes."),
            Self::ProvisioningAccepted { minutes } => {
                write!(f, "Warmup set to {minutes} min. Heating sensor...")
            }
            Self::ProvisioningRejected => {
                write!(f, "Invalid warmup. Send a positive whole number of minutes.")
            }
            Self::SensorReady => write!(f, "Sensor warmed up. Calibrating baseline..."),
            Self::BaselineCalibrated { baseline } => {
                write!(f, "Baseline calibrated: {baseline}. Monitoring started.")
            }
            Self::Recalibrating => write!(f, "Recalibrating baseline..."),
            Self::LeakDetected {
                reading,
                baseline,
                threshold,
            } => write!(
                f,
                "GAS LEAK DETECTED! reading={reading} baseline={baseline} threshold={threshold}"
            ),
            Self::Normalized => write!(f, "Gas level back to normal."),
            Self::Status(report) => write!(f, "{report}"),
            Self::ResetAck => write!(f, "Restarting..."),
            Self::Fault(fault) => write!(f, "Monitor halted: {fault}. Power-cycle required."),
        }
    }
}

/// Hand a notification to the sink. Failures are logged and dropped.
pub fn publish(sink: &mut impl NotificationSink, notification: &Notification) {
    info!("NOTIFY | {:?}", notification);
    if let Err(e) = sink.notify(notification) {
        warn!("NOTIFY | dropped ({}): {:?}", e, notification);
    }
}
