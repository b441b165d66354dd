//! Phase handlers.
//!
//! Each phase has an `update` handler that runs once per tick while the
//! phase is active and returns `Some(next)` to request a transition, plus
//! an `enter` action applied by the controller when the transition
//! happens. Handlers inspect state and return; none of them waits.
//!
//! | Phase                 | Enter                         | Leaves when                        |
//! |-----------------------|-------------------------------|------------------------------------|
//! | AwaitingConfiguration | —                             | `provision()` is called            |
//! | Warmup                | stamp entry                   | warmup duration elapsed            |
//! | CalibratingBaseline   | alert outputs off, open window| window elapsed → baseline          |
//! | Monitoring            | first read due immediately    | baseline older than recal. period  |
//! | Halted                | everything off, alert LED on  | never                              |

use log::{info, warn};

use crate::app::events::{Notification, publish};
use crate::app::ports::{ActuatorPort, NotificationSink, SensorPort};
use crate::config::CALIBRATION_SAMPLE_INTERVAL_MS;
use crate::detection::AlertTransition;
use crate::error::SensorError;
use crate::sensors::SensorSample;

use super::Phase;
use super::context::MonitorContext;

// ---------------------------------------------------------------------------
// Enter actions
// ---------------------------------------------------------------------------

pub fn enter(phase: Phase, ctx: &mut MonitorContext, now_ms: u64, hw: &mut impl ActuatorPort) {
    ctx.phase_entered_ms = now_ms;
    match phase {
        Phase::AwaitingConfiguration => {}
        Phase::Warmup => {
            ctx.last_progress_log_ms = now_ms;
        }
        Phase::CalibratingBaseline => {
            ctx.presenter.force_off(hw);
            ctx.calibration.begin_window(now_ms);
            ctx.next_calibration_sample_ms = now_ms;
        }
        Phase::Monitoring => {
            ctx.last_read_ms = None;
        }
        Phase::Halted => {
            ctx.presenter.force_off(hw);
            hw.all_off();
            hw.set_alert_led(true);
        }
    }
}

// ---------------------------------------------------------------------------
// Update handlers
// ---------------------------------------------------------------------------

/// Warmup: wait for the sensor heater, logging progress now and then.
pub fn warmup(
    ctx: &mut MonitorContext,
    now_ms: u64,
    sink: &mut impl NotificationSink,
) -> Option<Phase> {
    let elapsed = ctx.ms_in_phase(now_ms);
    if elapsed >= ctx.config.warmup_duration_ms {
        publish(sink, &Notification::SensorReady);
        return Some(Phase::CalibratingBaseline);
    }

    if now_ms.saturating_sub(ctx.last_progress_log_ms) >= ctx.config.warmup_log_interval_ms {
        ctx.last_progress_log_ms = now_ms;
        info!(
            "Warmup: {}s of {}s",
            elapsed / 1000,
            ctx.config.warmup_duration_ms / 1000
        );
    }
    None
}

/// CalibratingBaseline: sample at the calibration sub-interval until the
/// window closes, then hand over to Monitoring.
pub fn calibrating(
    ctx: &mut MonitorContext,
    now_ms: u64,
    hw: &mut (impl SensorPort + ActuatorPort),
    sink: &mut impl NotificationSink,
) -> Option<Phase> {
    if ctx.calibration.window_elapsed(now_ms) {
        let baseline = ctx.calibration.close_window(now_ms);
        publish(
            sink,
            &Notification::BaselineCalibrated {
                baseline: baseline.value,
            },
        );
        hw.beep(ctx.config.calibrated_beep_ms);
        return Some(Phase::Monitoring);
    }

    if now_ms >= ctx.next_calibration_sample_ms {
        ctx.next_calibration_sample_ms = now_ms + CALIBRATION_SAMPLE_INTERVAL_MS;
        match take_sample(hw, now_ms) {
            Ok(sample) => ctx.calibration.accumulate(sample),
            Err(e) => warn!("Calibration: read failed ({}), sample skipped", e),
        }
    }
    None
}

/// Monitoring: recalibrate when due, otherwise read, evaluate, notify and
/// drive the alert outputs.
pub fn monitoring(
    ctx: &mut MonitorContext,
    now_ms: u64,
    hw: &mut (impl SensorPort + ActuatorPort),
    sink: &mut impl NotificationSink,
) -> Option<Phase> {
    if ctx.calibration.recalibration_due(now_ms) {
        publish(sink, &Notification::Recalibrating);
        return Some(Phase::CalibratingBaseline);
    }

    let read_due = ctx
        .last_read_ms
        .is_none_or(|t| now_ms.saturating_sub(t) >= ctx.config.gas_read_interval_ms);
    if read_due {
        ctx.last_read_ms = Some(now_ms);
        match take_sample(hw, now_ms) {
            Ok(sample) => {
                ctx.history.record(sample.value);
                ctx.presenter.pulse_status(now_ms, hw);
                if let Some(baseline) = ctx.calibration.baseline() {
                    if ctx.detector.evaluate(sample, baseline) == AlertTransition::Cleared {
                        publish(sink, &Notification::Normalized);
                    }
                }
            }
            Err(e) => warn!("Monitoring: read failed ({}), sample skipped", e),
        }
    }

    if let Some(notification) = ctx.detector.maybe_notify(now_ms) {
        publish(sink, &notification);
    }

    ctx.presenter.update(now_ms, ctx.detector.is_active(), hw);
    None
}

/// Halted: keep the alert LED lit. Nothing else runs.
pub fn halted(hw: &mut impl ActuatorPort) -> Option<Phase> {
    if !hw.alert_led() {
        hw.set_alert_led(true);
    }
    None
}

fn take_sample(hw: &mut impl SensorPort, now_ms: u64) -> Result<SensorSample, SensorError> {
    hw.read_gas().and_then(|raw| SensorSample::new(now_ms, raw))
}
