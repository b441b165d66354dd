//! Alert presentation engine.
//!
//! Turns the leak detector's `active` flag into the blink/beep patterns
//! on the indicator outputs. The lifecycle controller calls `update()`
//! every monitoring tick; nothing here ever sleeps.
//!
//! ## Outputs
//!
//! | Output     | While alert active                     | Otherwise |
//! |------------|----------------------------------------|-----------|
//! | Alert LED  | toggles every `led_blink_interval_ms`  | off       |
//! | Buzzer     | toggles every `buzzer_beep_ms`         | off       |
//! | Status LED | on for `status_pulse_ms` after a read  | same      |
//!
//! Both toggles start in the ON phase on the inactive→active edge.

use crate::app::ports::ActuatorPort;
use crate::config::SystemConfig;

/// Square wave driven by elapsed-time comparisons against the last toggle.
#[derive(Debug, Clone, Copy)]
pub struct ToggleTimer {
    period_ms: u64,
    last_toggle_ms: u64,
    level: bool,
}

impl ToggleTimer {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            last_toggle_ms: 0,
            level: false,
        }
    }

    /// Begin a new pattern in the ON phase.
    pub fn start(&mut self, now_ms: u64) {
        self.level = true;
        self.last_toggle_ms = now_ms;
    }

    pub fn stop(&mut self) {
        self.level = false;
    }

    /// Flip the level if a full period has elapsed. Returns `true` when
    /// the level changed.
    pub fn update(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_toggle_ms) < self.period_ms {
            return false;
        }
        self.level = !self.level;
        self.last_toggle_ms = now_ms;
        true
    }

    pub fn level(&self) -> bool {
        self.level
    }
}

/// Drives alert LED, buzzer and status pulse. Stack-allocated, no heap.
pub struct AlertPresenter {
    led: ToggleTimer,
    buzzer: ToggleTimer,
    was_active: bool,
    status_pulse_ms: u64,
    status_off_at_ms: Option<u64>,
}

impl AlertPresenter {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            led: ToggleTimer::new(config.led_blink_interval_ms),
            buzzer: ToggleTimer::new(config.buzzer_beep_ms),
            was_active: false,
            status_pulse_ms: config.status_pulse_ms,
            status_off_at_ms: None,
        }
    }

    /// Advance the patterns. Call once per monitoring tick.
    pub fn update(&mut self, now_ms: u64, alert_active: bool, hw: &mut impl ActuatorPort) {
        if alert_active {
            if self.was_active {
                if self.led.update(now_ms) {
                    hw.set_alert_led(self.led.level());
                }
                if self.buzzer.update(now_ms) {
                    hw.set_buzzer(self.buzzer.level());
                }
            } else {
                self.led.start(now_ms);
                self.buzzer.start(now_ms);
                hw.set_alert_led(true);
                hw.set_buzzer(true);
            }
        } else if self.was_active {
            self.silence(hw);
        }
        self.was_active = alert_active;

        if self.status_off_at_ms.is_some_and(|t| now_ms >= t) {
            hw.set_status_led(false);
            self.status_off_at_ms = None;
        }
    }

    /// Light the status LED for one pulse, marking a fresh reading.
    pub fn pulse_status(&mut self, now_ms: u64, hw: &mut impl ActuatorPort) {
        hw.set_status_led(true);
        self.status_off_at_ms = Some(now_ms + self.status_pulse_ms);
    }

    /// All indicator outputs off; the next active update starts a fresh
    /// pattern.
    pub fn force_off(&mut self, hw: &mut impl ActuatorPort) {
        self.silence(hw);
        self.was_active = false;
        if self.status_off_at_ms.take().is_some() {
            hw.set_status_led(false);
        }
    }

    fn silence(&mut self, hw: &mut impl ActuatorPort) {
        self.led.stop();
        self.buzzer.stop();
        hw.set_alert_led(false);
        hw.set_buzzer(false);
    }
}
