//! Log-based notification sink adapter.
//!
//! Implements [`NotificationSink`] by writing every outbound message to
//! the ESP-IDF logger (UART / USB-CDC in production). Paired with the
//! channel sink in `main` so the serial console mirrors what the user
//! receives.

use log::{info, warn};

use crate::app::events::Notification;
use crate::app::ports::NotificationSink;
use crate::error::CommsError;

/// Adapter that logs every [`Notification`] to the serial console.
#[derive(Default)]
pub struct LogNotificationSink;

impl LogNotificationSink {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for LogNotificationSink {
    fn notify(&mut self, notification: &Notification) -> Result<(), CommsError> {
        match notification {
            Notification::LeakDetected { .. } | Notification::Fault(_) => {
                warn!("MSG | {}", notification);
            }
            Notification::Status(report) => {
                info!(
                    "MSG | status reading={:?} avg={} baseline={:?} threshold={:?} ping={} alert={}",
                    report.latest,
                    report.average,
                    report.baseline,
                    report.threshold,
                    report.latency_or_sentinel(),
                    report.alert_active,
                );
            }
            _ => info!("MSG | {}", notification),
        }
        Ok(())
    }
}
