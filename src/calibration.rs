//! Baseline calibration engine.
//!
//! Collects readings over a fixed window and reduces them to a clean-air
//! reference ("baseline"). The lifecycle controller decides when a window
//! opens and closes; this module owns the arithmetic and the
//! recalibration cadence.
//!
//! ```text
//!  begin_window ──▶ accumulate × n ──▶ close_window ──▶ Baseline
//!                                                          │
//!        recalibration_due(now) ◀── established_at + period ┘
//! ```

use log::{info, warn};

use crate::config::{FALLBACK_BASELINE, SystemConfig};
use crate::sensors::SensorSample;

/// Clean-air reference established by the most recent window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baseline {
    pub value: u16,
    pub established_at_ms: u64,
}

/// An open calibration window. Exists only between `begin_window` and
/// `close_window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationWindow {
    pub start_ms: u64,
    pub sample_sum: u32,
    pub sample_count: u32,
}

impl CalibrationWindow {
    /// Floor mean of the collected samples, or the fallback when the
    /// window saw none.
    pub fn mean(&self) -> u16 {
        if self.sample_count == 0 {
            FALLBACK_BASELINE
        } else {
            (self.sample_sum / self.sample_count) as u16
        }
    }
}

pub struct CalibrationEngine {
    window: Option<CalibrationWindow>,
    baseline: Option<Baseline>,
    window_ms: u64,
    recalibration_period_ms: u64,
}

impl CalibrationEngine {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            window: None,
            baseline: None,
            window_ms: config.baseline_window_ms,
            recalibration_period_ms: config.recalibration_period_ms,
        }
    }

    /// Open a fresh window at `now_ms`. An already open window is discarded.
    pub fn begin_window(&mut self, now_ms: u64) {
        if self.window.is_some() {
            warn!("Calibration: discarding unfinished window");
        }
        self.window = Some(CalibrationWindow {
            start_ms: now_ms,
            sample_sum: 0,
            sample_count: 0,
        });
    }

    /// Add one sample to the open window. Ignored when no window is open.
    pub fn accumulate(&mut self, sample: SensorSample) {
        let Some(window) = self.window.as_mut() else {
            warn!("Calibration: sample at {}ms with no open window, ignored", sample.timestamp_ms);
            return;
        };
        window.sample_sum = window.sample_sum.saturating_add(u32::from(sample.value));
        window.sample_count += 1;
    }

    /// Whether the open window has run its full length.
    pub fn window_elapsed(&self, now_ms: u64) -> bool {
        self.window
            .is_some_and(|w| now_ms.saturating_sub(w.start_ms) >= self.window_ms)
    }

    /// Reduce the open window to a baseline stamped at `now_ms`.
    ///
    /// # Panics
    ///
    /// Closing without an open window is a sequencing bug in the caller.
    pub fn close_window(&mut self, now_ms: u64) -> Baseline {
        let Some(window) = self.window.take() else {
            panic!("close_window called with no open calibration window");
        };
        if window.sample_count == 0 {
            warn!("Calibration: window collected no samples, using fallback {}", FALLBACK_BASELINE);
        }
        let baseline = Baseline {
            value: window.mean(),
            established_at_ms: now_ms,
        };
        info!(
            "Calibration: baseline={} from {} samples",
            baseline.value, window.sample_count
        );
        self.baseline = Some(baseline);
        baseline
    }

    /// Whether the current baseline is old enough to be refreshed.
    /// Always `false` before the first baseline exists.
    pub fn recalibration_due(&self, now_ms: u64) -> bool {
        self.baseline.is_some_and(|b| {
            now_ms.saturating_sub(b.established_at_ms) >= self.recalibration_period_ms
        })
    }

    pub fn baseline(&self) -> Option<Baseline> {
        self.baseline
    }

    pub fn window(&self) -> Option<&CalibrationWindow> {
        self.window.as_ref()
    }
}
