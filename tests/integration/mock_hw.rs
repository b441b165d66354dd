//! Mock adapters for integration tests.
//!
//! Records every actuator call and every notification so tests can assert
//! on the full history without touching real GPIO or a chat transport.

use std::cell::Cell;
use std::collections::VecDeque;

use gaswatch::app::events::Notification;
use gaswatch::app::ports::{
    ActuatorPort, Clock, CommandChannel, ConnectivityPort, InboundMessage, NotificationSink,
    SensorPort,
};
use gaswatch::app::service::{AppService, TickOutcome};
use gaswatch::config::SystemConfig;
use gaswatch::error::{CommsError, Error, SensorError};

pub const OWNER: &str = "1234";

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    AlertLed(bool),
    StatusLed(bool),
    Buzzer(bool),
    Beep(u32),
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub gas: Result<u16, SensorError>,
    pub reads: u32,
    pub alert: bool,
    pub status: bool,
    pub buzzer: bool,
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(gas: u16) -> Self {
        Self {
            gas: Ok(gas),
            reads: 0,
            alert: false,
            status: false,
            buzzer: false,
            calls: Vec::new(),
        }
    }

    pub fn beeps(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActuatorCall::Beep(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }
}

impl SensorPort for MockHardware {
    fn read_gas(&mut self) -> Result<u16, SensorError> {
        self.reads += 1;
        self.gas
    }
}

impl ActuatorPort for MockHardware {
    fn set_alert_led(&mut self, on: bool) {
        self.alert = on;
        self.calls.push(ActuatorCall::AlertLed(on));
    }

    fn alert_led(&self) -> bool {
        self.alert
    }

    fn set_status_led(&mut self, on: bool) {
        self.status = on;
        self.calls.push(ActuatorCall::StatusLed(on));
    }

    fn status_led(&self) -> bool {
        self.status
    }

    fn set_buzzer(&mut self, on: bool) {
        self.buzzer = on;
        self.calls.push(ActuatorCall::Buzzer(on));
    }

    fn beep(&mut self, duration_ms: u32) {
        self.calls.push(ActuatorCall::Beep(duration_ms));
    }

    fn all_off(&mut self) {
        self.alert = false;
        self.status = false;
        self.buzzer = false;
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── MockClock ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockClock {
    now: Cell<u64>,
}

impl MockClock {
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

// ── MockNet ───────────────────────────────────────────────────

pub struct MockNet {
    pub up: bool,
    pub latency_ms: Option<u32>,
    pub polls: u32,
    pub reconnect_attempts: u32,
    pub pings: u32,
}

impl MockNet {
    pub fn new() -> Self {
        Self {
            up: true,
            latency_ms: Some(42),
            polls: 0,
            reconnect_attempts: 0,
            pings: 0,
        }
    }
}

impl ConnectivityPort for MockNet {
    fn connect(&mut self) -> Result<(), CommsError> {
        if self.up {
            Ok(())
        } else {
            Err(CommsError::ConnectFailed)
        }
    }

    fn is_connected(&self) -> bool {
        self.up
    }

    fn poll(&mut self) {
        self.polls += 1;
        if !self.up {
            self.reconnect_attempts += 1;
        }
    }

    fn ping_latency_ms(&mut self) -> Option<u32> {
        self.pings += 1;
        self.latency_ms
    }
}

// ── MockInbox ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockInbox {
    queue: VecDeque<InboundMessage>,
}

impl MockInbox {
    pub fn push(&mut self, sender: &str, text: &str) {
        self.queue.push_back(InboundMessage::new(sender, text));
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl CommandChannel for MockInbox {
    fn poll(&mut self) -> Option<InboundMessage> {
        self.queue.pop_front()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub sent: Vec<Notification>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&Notification) -> bool) -> usize {
        self.sent.iter().filter(|n| pred(n)).count()
    }

    pub fn leak_alerts(&self) -> usize {
        self.count(|n| matches!(n, Notification::LeakDetected { .. }))
    }

    pub fn last_text(&self) -> Option<String> {
        self.sent.last().map(|n| n.to_string())
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, notification: &Notification) -> Result<(), CommsError> {
        self.sent.push(notification.clone());
        Ok(())
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// An [`AppService`] wired to a full set of mocks.
pub struct Rig {
    pub app: AppService,
    pub clock: MockClock,
    pub hw: MockHardware,
    pub net: MockNet,
    pub inbox: MockInbox,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    pub fn new(gas: u16) -> Self {
        Self::with_config(owner_config(), gas)
    }

    pub fn with_config(config: SystemConfig, gas: u16) -> Self {
        Self {
            app: AppService::new(config),
            clock: MockClock::default(),
            hw: MockHardware::new(gas),
            net: MockNet::new(),
            inbox: MockInbox::default(),
            sink: RecordingSink::default(),
        }
    }

    pub fn boot(&mut self) -> Result<(), Error> {
        self.app
            .boot(&self.clock, &mut self.hw, &mut self.net, &mut self.sink)
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.app.tick(
            &self.clock,
            &mut self.hw,
            &mut self.net,
            &mut self.inbox,
            &mut self.sink,
        )
    }

    /// Advance the clock by `step_ms`, then tick once.
    pub fn step(&mut self, step_ms: u64) -> TickOutcome {
        self.clock.advance(step_ms);
        self.tick()
    }

    /// Tick every `step_ms` until `duration_ms` has passed.
    pub fn run_for(&mut self, duration_ms: u64, step_ms: u64) {
        let end = self.clock.now() + duration_ms;
        while self.clock.now() < end {
            self.step(step_ms);
        }
    }

    /// Tick every `step_ms` until `done` holds. Panics after `limit_ms`.
    pub fn run_until(&mut self, step_ms: u64, limit_ms: u64, done: impl Fn(&Self) -> bool) {
        let end = self.clock.now() + limit_ms;
        while !done(self) {
            assert!(self.clock.now() < end, "condition not reached within {limit_ms}ms");
            self.step(step_ms);
        }
    }

    pub fn send(&mut self, text: &str) {
        self.inbox.push(OWNER, text);
    }
}

pub fn owner_config() -> SystemConfig {
    let mut config = SystemConfig::default();
    config.authorized_sender = OWNER.try_into().unwrap();
    config
}
