//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the lifecycle controller and everything around it
//! that is not sensor logic: boot checks, the provisioning dialogue,
//! command dispatch and connectivity upkeep. All I/O flows through port
//! traits injected at call sites, making the whole service testable with
//! mock adapters.
//!
//! ```text
//!   Clock ──────────┐
//!  SensorPort ──▶ ┌─┴──────────────────────┐ ──▶ NotificationSink
//!                 │       AppService        │
//! ActuatorPort ◀──│  Lifecycle · Commands   │ ◀── CommandChannel
//!                 └─┬──────────────────────┘
//!  ConnectivityPort ◀┘
//! ```

use log::{error, info, warn};

use crate::config::{MAX_PLAUSIBLE, MIN_PLAUSIBLE, SystemConfig};
use crate::error::{Error, InitFault};
use crate::fsm::{LifecycleController, Phase};

use super::commands::{Command, parse_warmup_minutes};
use super::events::{Notification, StatusReport, publish};
use super::ports::{
    ActuatorPort, Clock, CommandChannel, ConnectivityPort, InboundMessage, NotificationSink,
    SensorPort,
};

/// What the hosting loop should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep ticking.
    Continue,
    /// `/reset` was acknowledged; restart the device.
    RestartRequested,
    /// The device is halted; ticking only keeps the alert LED lit.
    Halted,
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    lifecycle: LifecycleController,
    last_command_poll_ms: Option<u64>,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** run the boot checks; call [`boot`](Self::boot) next.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            lifecycle: LifecycleController::new(config),
            last_command_poll_ms: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Verify the sensor and the network, then ask for the warmup time.
    ///
    /// On failure the controller is halted with the alert LED lit and the
    /// fault is returned; the device never proceeds to Warmup.
    pub fn boot(
        &mut self,
        clock: &impl Clock,
        hw: &mut (impl SensorPort + ActuatorPort),
        net: &mut impl ConnectivityPort,
        sink: &mut impl NotificationSink,
    ) -> Result<(), Error> {
        let now = clock.now_ms();
        hw.all_off();

        let cold = hw.read_gas();
        let fault = match cold {
            Ok(raw) if (MIN_PLAUSIBLE..=MAX_PLAUSIBLE).contains(&raw) => {
                info!("Boot: cold reading {} is plausible", raw);
                None
            }
            Ok(raw) => Some(InitFault::SensorImplausible(Some(raw))),
            Err(e) => {
                error!("Boot: cold read failed ({})", e);
                Some(InitFault::SensorImplausible(None))
            }
        };

        let fault = fault.or_else(|| match net.connect() {
            Ok(()) => None,
            Err(e) => {
                error!("Boot: network unavailable ({})", e);
                Some(InitFault::ConnectivityUnavailable)
            }
        });

        if let Some(fault) = fault {
            self.lifecycle.halt(fault, now, hw);
            publish(sink, &Notification::Fault(fault));
            return Err(fault.into());
        }

        info!("Boot: checks passed, awaiting warmup duration");
        publish(sink, &Notification::ProvisioningPrompt);
        Ok(())
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one cooperative cycle: clock → connectivity → commands →
    /// lifecycle phase.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`], which avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        clock: &impl Clock,
        hw: &mut (impl SensorPort + ActuatorPort),
        net: &mut impl ConnectivityPort,
        inbox: &mut impl CommandChannel,
        sink: &mut impl NotificationSink,
    ) -> TickOutcome {
        let now = clock.now_ms();

        if self.lifecycle.phase() == Phase::Halted {
            self.lifecycle.tick(now, hw, sink);
            return TickOutcome::Halted;
        }

        net.poll();

        if self.command_poll_due(now) {
            self.last_command_poll_ms = Some(now);
            while let Some(msg) = inbox.poll() {
                if self.handle_message(&msg, now, hw, net, sink) == TickOutcome::RestartRequested {
                    return TickOutcome::RestartRequested;
                }
            }
        }

        self.lifecycle.tick(now, hw, sink);
        TickOutcome::Continue
    }

    // ── Command handling ──────────────────────────────────────

    /// Act on one inbound message.
    pub fn handle_message(
        &mut self,
        msg: &InboundMessage,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        net: &mut impl ConnectivityPort,
        sink: &mut impl NotificationSink,
    ) -> TickOutcome {
        if self.lifecycle.phase() == Phase::Halted {
            return TickOutcome::Halted;
        }
        if msg.sender != self.lifecycle.config().authorized_sender {
            warn!("CMD | ignoring message from unauthorized sender '{}'", msg.sender);
            return TickOutcome::Continue;
        }

        match Command::parse(&msg.text) {
            Some(Command::Reset) => {
                info!("CMD | /reset");
                publish(sink, &Notification::ResetAck);
                TickOutcome::RestartRequested
            }
            Some(Command::Status) => {
                info!("CMD | /status");
                let report = self.status_report(net);
                publish(sink, &Notification::Status(report));
                TickOutcome::Continue
            }
            None if self.lifecycle.phase() == Phase::AwaitingConfiguration => {
                self.provision_from(&msg.text, now_ms, hw, sink);
                TickOutcome::Continue
            }
            None => {
                info!("CMD | ignoring unrecognized command");
                TickOutcome::Continue
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Gather the `/status` snapshot. Runs the latency ping.
    pub fn status_report(&self, net: &mut impl ConnectivityPort) -> StatusReport {
        let history = self.lifecycle.history();
        StatusReport {
            latest: history.latest(),
            average: history.average(),
            baseline: self.lifecycle.baseline().map(|b| b.value),
            threshold: self.lifecycle.threshold(),
            latency_ms: net.ping_latency_ms(),
            alert_active: self.lifecycle.alert_state().active,
        }
    }

    pub fn phase(&self) -> Phase {
        self.lifecycle.phase()
    }

    pub fn lifecycle(&self) -> &LifecycleController {
        &self.lifecycle
    }

    // ── Internal ──────────────────────────────────────────────

    fn command_poll_due(&self, now_ms: u64) -> bool {
        let interval = self.lifecycle.config().command_poll_interval_ms;
        self.last_command_poll_ms
            .is_none_or(|t| now_ms.saturating_sub(t) >= interval)
    }

    fn provision_from(
        &mut self,
        text: &str,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        sink: &mut impl NotificationSink,
    ) {
        match parse_warmup_minutes(text) {
            Some(minutes) => {
                self.lifecycle
                    .provision(u64::from(minutes) * 60_000, now_ms, hw);
                publish(sink, &Notification::ProvisioningAccepted { minutes });
            }
            None => {
                warn!("Provisioning: rejected reply '{}'", text);
                publish(sink, &Notification::ProvisioningRejected);
            }
        }
    }
}
