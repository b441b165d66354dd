//! Sensor lifecycle state machine.
//!
//! ```text
//!  AwaitingConfiguration ──provision──▶ Warmup ──warmup elapsed──▶ CalibratingBaseline
//!                                                                     │        ▲
//!                                                     window closed   ▼        │ recalibration due
//!                                                                   Monitoring ┘
//!
//!  boot fault ──▶ Halted (terminal)
//! ```
//!
//! Each tick the controller runs the update handler of the **current**
//! phase only. If it returns `Some(next)`, the controller logs the
//! transition, runs the `enter` action of the next phase and returns;
//! the next phase first runs on the following tick. All handlers receive
//! `&mut MonitorContext`, which holds every component the phases share.

pub mod context;
pub mod states;

use context::MonitorContext;
use log::{error, info, warn};

use crate::app::ports::{ActuatorPort, NotificationSink, SensorPort};
use crate::calibration::Baseline;
use crate::config::{HISTORY_LEN, SystemConfig};
use crate::detection::AlertState;
use crate::error::InitFault;
use crate::history::HistoryBuffer;

// ---------------------------------------------------------------------------
// Phase identity
// ---------------------------------------------------------------------------

/// Lifecycle phases. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Waiting for the user to supply the warmup duration.
    AwaitingConfiguration,
    /// Sensor heater settling; readings are not trusted yet.
    Warmup,
    /// Collecting clean-air samples into a baseline.
    CalibratingBaseline,
    /// Normal operation.
    Monitoring,
    /// Boot check failed. Terminal.
    Halted,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Self::AwaitingConfiguration => "AwaitingConfiguration",
            Self::Warmup => "Warmup",
            Self::CalibratingBaseline => "CalibratingBaseline",
            Self::Monitoring => "Monitoring",
            Self::Halted => "Halted",
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns the active phase and the shared [`MonitorContext`].
pub struct LifecycleController {
    phase: Phase,
    ctx: MonitorContext,
}

impl LifecycleController {
    /// Start in [`Phase::AwaitingConfiguration`].
    pub fn new(config: SystemConfig) -> Self {
        info!("FSM starting in phase: {}", Phase::AwaitingConfiguration.name());
        Self {
            phase: Phase::AwaitingConfiguration,
            ctx: MonitorContext::new(config),
        }
    }

    /// Supply the warmup duration and start warming up.
    /// Ignored outside [`Phase::AwaitingConfiguration`].
    pub fn provision(&mut self, warmup_ms: u64, now_ms: u64, hw: &mut impl ActuatorPort) {
        if self.phase != Phase::AwaitingConfiguration {
            warn!("FSM: provision ignored in phase {}", self.phase.name());
            return;
        }
        self.ctx.config.warmup_duration_ms = warmup_ms;
        info!("FSM: warmup set to {}ms", warmup_ms);
        self.transition(Phase::Warmup, now_ms, hw);
    }

    /// Enter the terminal [`Phase::Halted`] from any phase.
    pub fn halt(&mut self, fault: InitFault, now_ms: u64, hw: &mut impl ActuatorPort) {
        error!("FSM: halting — {}", fault);
        self.ctx.fault = Some(fault);
        if self.phase != Phase::Halted {
            self.transition(Phase::Halted, now_ms, hw);
        }
    }

    /// Advance the active phase by one tick.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl NotificationSink,
    ) {
        let next = match self.phase {
            Phase::AwaitingConfiguration => None,
            Phase::Warmup => states::warmup(&mut self.ctx, now_ms, sink),
            Phase::CalibratingBaseline => states::calibrating(&mut self.ctx, now_ms, hw, sink),
            Phase::Monitoring => states::monitoring(&mut self.ctx, now_ms, hw, sink),
            Phase::Halted => states::halted(hw),
        };

        if let Some(next) = next {
            self.transition(next, now_ms, hw);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &SystemConfig {
        &self.ctx.config
    }

    pub fn history(&self) -> &HistoryBuffer<HISTORY_LEN> {
        &self.ctx.history
    }

    pub fn baseline(&self) -> Option<Baseline> {
        self.ctx.calibration.baseline()
    }

    /// Alert threshold for the current baseline.
    pub fn threshold(&self) -> Option<u32> {
        self.baseline().map(|b| self.ctx.detector.threshold(b.value))
    }

    pub fn alert_state(&self) -> AlertState {
        self.ctx.detector.state()
    }

    pub fn fault(&self) -> Option<InitFault> {
        self.ctx.fault
    }

    /// Milliseconds spent in the current phase.
    pub fn ms_in_phase(&self, now_ms: u64) -> u64 {
        self.ctx.ms_in_phase(now_ms)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next: Phase, now_ms: u64, hw: &mut impl ActuatorPort) {
        info!("FSM transition: {} -> {}", self.phase.name(), next.name());
        self.phase = next;
        states::enter(next, &mut self.ctx, now_ms, hw);
    }
}
