//! Shared mutable context threaded through every phase handler.
//!
//! `MonitorContext` is the single struct the phase handlers read from and
//! write to: configuration, the reading history, the calibration engine,
//! the leak detector, the alert presenter and the per-phase timestamps.

use crate::calibration::CalibrationEngine;
use crate::config::{HISTORY_LEN, SystemConfig};
use crate::detection::LeakDetector;
use crate::drivers::alert_patterns::AlertPresenter;
use crate::error::InitFault;
use crate::history::HistoryBuffer;

pub struct MonitorContext {
    // -- Configuration --
    pub config: SystemConfig,

    // -- Components --
    pub history: HistoryBuffer<HISTORY_LEN>,
    pub calibration: CalibrationEngine,
    pub detector: LeakDetector,
    pub presenter: AlertPresenter,

    // -- Timing --
    /// Clock reading at which the current phase was entered.
    pub phase_entered_ms: u64,
    /// Last warmup progress log line.
    pub last_progress_log_ms: u64,
    /// Earliest time the next calibration sample may be taken.
    pub next_calibration_sample_ms: u64,
    /// Last monitoring read attempt; `None` right after entering Monitoring.
    pub last_read_ms: Option<u64>,

    // -- Fault --
    /// Why the device halted, if it did.
    pub fault: Option<InitFault>,
}

impl MonitorContext {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            history: HistoryBuffer::new(),
            calibration: CalibrationEngine::new(&config),
            detector: LeakDetector::new(&config),
            presenter: AlertPresenter::new(&config),
            phase_entered_ms: 0,
            last_progress_log_ms: 0,
            next_calibration_sample_ms: 0,
            last_read_ms: None,
            fault: None,
            config,
        }
    }

    /// Milliseconds spent in the current phase.
    pub fn ms_in_phase(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.phase_entered_ms)
    }
}
