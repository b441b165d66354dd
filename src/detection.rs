//! Leak detection with edge-triggered alert state.
//!
//! A reading strictly above `baseline + leak_sensitivity_offset` starts a
//! leak episode; a reading at or below it ends one. Only the edges are
//! reported, and notifications inside an episode are rate-limited:
//!
//! ```text
//!   inactive ──(reading > threshold)──▶ active ──(reading ≤ threshold)──▶ inactive
//!                                         │
//!               first notification immediately, then one per repeat interval
//! ```
//!
//! A single sample is enough to trip the alert; there is no debounce.

use log::info;

use crate::app::events::Notification;
use crate::calibration::Baseline;
use crate::config::SystemConfig;
use crate::sensors::SensorSample;

/// Alert bookkeeping for the current leak episode.
///
/// `first_notification_sent` is always `false` while `active` is `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlertState {
    pub active: bool,
    pub first_notification_sent: bool,
    pub last_notification_at_ms: u64,
}

/// Result of evaluating one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertTransition {
    Activated,
    Cleared,
    Unchanged,
}

pub struct LeakDetector {
    state: AlertState,
    offset: u16,
    repeat_interval_ms: u64,
    last_reading: u16,
    last_baseline: u16,
}

impl LeakDetector {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            state: AlertState::default(),
            offset: config.leak_sensitivity_offset,
            repeat_interval_ms: config.notification_repeat_interval_ms,
            last_reading: 0,
            last_baseline: 0,
        }
    }

    /// Alert threshold for `baseline`.
    pub fn threshold(&self, baseline: u16) -> u32 {
        u32::from(baseline) + u32::from(self.offset)
    }

    /// Compare one sample against the baseline and update the alert state.
    pub fn evaluate(&mut self, sample: SensorSample, baseline: Baseline) -> AlertTransition {
        self.last_reading = sample.value;
        self.last_baseline = baseline.value;

        let threshold = self.threshold(baseline.value);
        let over = u32::from(sample.value) > threshold;

        match (over, self.state.active) {
            (true, false) => {
                self.state.active = true;
                self.state.first_notification_sent = false;
                info!(
                    "Leak: ACTIVATED reading={} threshold={} at {}ms",
                    sample.value, threshold, sample.timestamp_ms
                );
                AlertTransition::Activated
            }
            (false, true) => {
                self.state.active = false;
                self.state.first_notification_sent = false;
                info!(
                    "Leak: cleared reading={} threshold={} at {}ms",
                    sample.value, threshold, sample.timestamp_ms
                );
                AlertTransition::Cleared
            }
            _ => AlertTransition::Unchanged,
        }
    }

    /// Leak notification if one is due at `now_ms`.
    ///
    /// The first notification of an episode goes out immediately; repeats
    /// follow every `notification_repeat_interval_ms` while the episode lasts.
    pub fn maybe_notify(&mut self, now_ms: u64) -> Option<Notification> {
        if !self.state.active {
            return None;
        }
        let repeat_due =
            now_ms.saturating_sub(self.state.last_notification_at_ms) >= self.repeat_interval_ms;
        if self.state.first_notification_sent && !repeat_due {
            return None;
        }
        self.state.first_notification_sent = true;
        self.state.last_notification_at_ms = now_ms;
        Some(Notification::LeakDetected {
            reading: self.last_reading,
            baseline: self.last_baseline,
            threshold: self.threshold(self.last_baseline),
        })
    }

    pub fn state(&self) -> AlertState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }
}
