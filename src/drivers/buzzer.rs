//! Piezo buzzer driver (LEDC square wave).
//!
//! Continuous tone on/off for the alert pattern, plus a fire-and-forget
//! timed beep used as a confirmation chirp. The beep is ended by an
//! esp_timer one-shot, so callers never wait for it.
//!
//! On host builds the driver only tracks state so tests can inspect it.

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

pub struct Buzzer {
    tone_hz: u32,
    on: bool,
    beeps: u32,
    beep_pending: bool,
}

impl Buzzer {
    /// `tone_hz` must have been accepted by the LEDC timer at init.
    pub fn new(tone_hz: u32) -> Self {
        Self {
            tone_hz,
            on: false,
            beeps: 0,
            beep_pending: false,
        }
    }

    /// Start or stop the continuous alert tone. Starting the tone disarms
    /// any beep still running.
    pub fn set(&mut self, on: bool) {
        if on == self.on {
            return;
        }
        self.on = on;
        if on && self.beep_pending {
            self.beep_pending = false;
            #[cfg(target_os = "espidf")]
            hw_init::buzzer_cancel_beep();
        }
        #[cfg(target_os = "espidf")]
        if on {
            hw_init::buzzer_tone(self.tone_hz);
        } else {
            hw_init::buzzer_silence();
        }
    }

    /// Timed tone; returns immediately.
    pub fn beep(&mut self, duration_ms: u32) {
        self.beeps = self.beeps.saturating_add(1);
        // A beep ends in silence, which would cut an alert tone short.
        if self.on {
            return;
        }
        self.beep_pending = true;
        #[cfg(target_os = "espidf")]
        hw_init::buzzer_beep(self.tone_hz, duration_ms);
        #[cfg(not(target_os = "espidf"))]
        log::debug!("Buzzer(sim): beep {}Hz for {}ms", self.tone_hz, duration_ms);
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Number of timed beeps requested since boot.
    pub fn beep_count(&self) -> u32 {
        self.beeps
    }

    pub fn tone_hz(&self) -> u32 {
        self.tone_hz
    }

    /// Whether the last beep may still be armed. On target the flag stays
    /// set after the timer fires; disarming an expired beep is a no-op.
    pub fn beep_pending(&self) -> bool {
        self.beep_pending
    }
}
