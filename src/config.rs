//! System configuration parameters
//!
//! All tunable parameters for the GasWatch monitor. The warmup duration is
//! supplied at first boot through the provisioning dialogue; everything else
//! is a fixed default that may be overridden at build time with a JSON
//! document in `GASWATCH_CONFIG_JSON`.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

// --- Sensor range ---

/// Upper bound of a raw reading (12-bit ADC).
pub const MAX_RANGE: u16 = 4095;
/// Lowest cold reading accepted at boot. Below this the sensor is likely
/// disconnected or the heater is dead.
pub const MIN_PLAUSIBLE: u16 = 50;
/// Highest cold reading accepted at boot. Above this the input is likely
/// shorted to the supply rail.
pub const MAX_PLAUSIBLE: u16 = 4000;

// --- Calibration ---

/// Baseline used when a calibration window collected no samples.
pub const FALLBACK_BASELINE: u16 = 400;
/// Sub-interval between samples inside a calibration window.
pub const CALIBRATION_SAMPLE_INTERVAL_MS: u64 = 250;

// --- Misc ---

/// Number of readings kept for the `/status` running average.
pub const HISTORY_LEN: usize = 10;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Lifecycle ---
    /// Sensor heater warmup before the first calibration (milliseconds).
    /// Replaced by the provisioned value at first boot.
    pub warmup_duration_ms: u64,
    /// Length of one baseline calibration window (milliseconds)
    pub baseline_window_ms: u64,
    /// Time between baseline refreshes while monitoring (milliseconds)
    pub recalibration_period_ms: u64,

    // --- Detection ---
    /// Interval between readings while monitoring (milliseconds)
    pub gas_read_interval_ms: u64,
    /// Margin above baseline that counts as a leak (raw ADC counts)
    pub leak_sensitivity_offset: u16,
    /// Repeat interval for leak notifications while the alert persists
    pub notification_repeat_interval_ms: u64,

    // --- Presentation ---
    /// Alert LED toggle period (milliseconds)
    pub led_blink_interval_ms: u64,
    /// Buzzer toggle period (milliseconds)
    pub buzzer_beep_ms: u64,
    /// Buzzer tone frequency
    pub buzzer_tone_hz: u32,
    /// Status LED on-time after each reading (milliseconds)
    pub status_pulse_ms: u64,
    /// Confirmation beep once a baseline is established (milliseconds)
    pub calibrated_beep_ms: u32,

    // --- Commands / network ---
    /// How often the inbound command channel is drained (milliseconds)
    pub command_poll_interval_ms: u64,
    /// Only messages from this sender identity are acted upon
    pub authorized_sender: heapless::String<32>,
    /// IPv4 host used for the `/status` round-trip ping
    pub ping_host: [u8; 4],

    // --- Housekeeping ---
    /// Warmup progress log period (milliseconds)
    pub warmup_log_interval_ms: u64,
    /// Task watchdog timeout (milliseconds)
    pub watchdog_timeout_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Lifecycle
            warmup_duration_ms: 60_000,
            baseline_window_ms: 60_000,
            recalibration_period_ms: 6 * 60 * 60 * 1000, // 6 h

            // Detection
            gas_read_interval_ms: 1000,
            leak_sensitivity_offset: 450,
            notification_repeat_interval_ms: 60_000,

            // Presentation
            led_blink_interval_ms: 500,
            buzzer_beep_ms: 200,
            buzzer_tone_hz: 2000,
            status_pulse_ms: 50,
            calibrated_beep_ms: 150,

            // Commands / network
            command_poll_interval_ms: 1000,
            authorized_sender: heapless::String::new(),
            ping_host: [8, 8, 8, 8],

            // Housekeeping
            warmup_log_interval_ms: 30_000,
            watchdog_timeout_ms: 10_000,
        }
    }
}

impl SystemConfig {
    /// Parse a JSON override document. Missing fields keep their defaults.
    /// The result is validated before it is returned.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameter combinations the lifecycle cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baseline_window_ms < CALIBRATION_SAMPLE_INTERVAL_MS {
            return Err(ConfigError::ValidationFailed(
                "baseline_window_ms shorter than one calibration sample",
            ));
        }
        if self.recalibration_period_ms <= self.baseline_window_ms {
            return Err(ConfigError::ValidationFailed(
                "recalibration_period_ms must exceed baseline_window_ms",
            ));
        }
        if self.gas_read_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("gas_read_interval_ms is zero"));
        }
        if self.leak_sensitivity_offset == 0 || self.leak_sensitivity_offset > MAX_RANGE {
            return Err(ConfigError::ValidationFailed(
                "leak_sensitivity_offset outside 1..=MAX_RANGE",
            ));
        }
        if self.notification_repeat_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "notification_repeat_interval_ms is zero",
            ));
        }
        if self.led_blink_interval_ms == 0 || self.buzzer_beep_ms == 0 {
            return Err(ConfigError::ValidationFailed("alert toggle period is zero"));
        }
        if self.command_poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("command_poll_interval_ms is zero"));
        }
        Ok(())
    }
}
