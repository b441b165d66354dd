//! GPIO / peripheral pin assignments for the GasWatch board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Gas sensor — Analog (ADC1)
// ---------------------------------------------------------------------------

/// MQ-series gas sensor load resistor, via divider.
/// ADC1 channel 6 (GPIO 34 on ESP32).
pub const GAS_ADC_GPIO: i32 = 34;

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// Red alert LED (active HIGH). Also lit continuously when halted.
pub const ALERT_LED_GPIO: i32 = 25;
/// Green status LED, pulsed on every monitoring reading (active HIGH).
pub const STATUS_LED_GPIO: i32 = 26;

// ---------------------------------------------------------------------------
// Buzzer (passive piezo, driven by LEDC square wave)
// ---------------------------------------------------------------------------

pub const BUZZER_GPIO: i32 = 27;
