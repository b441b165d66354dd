//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the gas sensor, the two indicator LEDs and the buzzer, exposing
//! them through [`SensorPort`] and [`ActuatorPort`]. The LEDs are any
//! `embedded-hal` output pin (`PinDriver` on target, a plain struct in
//! tests). On non-espidf targets the sensor and buzzer use their
//! cfg-gated simulation paths.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::buzzer::Buzzer;
use crate::error::SensorError;
use crate::sensors::gas::GasSensor;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<A: OutputPin, S: OutputPin> {
    gas: GasSensor,
    alert_led: A,
    status_led: S,
    buzzer: Buzzer,
    alert_on: bool,
    status_on: bool,
}

impl<A: OutputPin, S: OutputPin> HardwareAdapter<A, S> {
    pub fn new(gas: GasSensor, alert_led: A, status_led: S, buzzer: Buzzer) -> Self {
        Self {
            gas,
            alert_led,
            status_led,
            buzzer,
            alert_on: false,
            status_on: false,
        }
    }

    pub fn gas_sensor(&self) -> &GasSensor {
        &self.gas
    }

    pub fn buzzer(&self) -> &Buzzer {
        &self.buzzer
    }
}

fn drive<P: OutputPin>(pin: &mut P, on: bool, name: &str) {
    let r = if on { pin.set_high() } else { pin.set_low() };
    if r.is_err() {
        warn!("GPIO: failed to drive {} {}", name, if on { "high" } else { "low" });
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<A: OutputPin, S: OutputPin> SensorPort for HardwareAdapter<A, S> {
    fn read_gas(&mut self) -> Result<u16, SensorError> {
        self.gas.read()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<A: OutputPin, S: OutputPin> ActuatorPort for HardwareAdapter<A, S> {
    fn set_alert_led(&mut self, on: bool) {
        drive(&mut self.alert_led, on, "alert LED");
        self.alert_on = on;
    }

    fn alert_led(&self) -> bool {
        self.alert_on
    }

    fn set_status_led(&mut self, on: bool) {
        drive(&mut self.status_led, on, "status LED");
        self.status_on = on;
    }

    fn status_led(&self) -> bool {
        self.status_on
    }

    fn set_buzzer(&mut self, on: bool) {
        self.buzzer.set(on);
    }

    fn beep(&mut self, duration_ms: u32) {
        self.buzzer.beep(duration_ms);
    }

    fn all_off(&mut self) {
        self.set_alert_led(false);
        self.set_status_led(false);
        self.buzzer.set(false);
    }
}
