//! MQ-series gas sensor driver.
//!
//! Reads the analog voltage of the sensor's load resistor through an ESP32
//! ADC channel. No conversion to ppm is done; detection works on raw counts
//! relative to a learned baseline.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static `AtomicU32` for injection, where
//! `SIM_READ_FAILED` simulates a failed conversion.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, Ordering};

use crate::config::MAX_RANGE;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::SensorError;

#[cfg(not(target_os = "espidf"))]
const SIM_READ_FAILED: u32 = u32::MAX;

#[cfg(not(target_os = "espidf"))]
static SIM_GAS_ADC: AtomicU32 = AtomicU32::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_gas_adc(raw: u16) {
    SIM_GAS_ADC.store(u32::from(raw), Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_fail_gas_adc() {
    SIM_GAS_ADC.store(SIM_READ_FAILED, Ordering::Relaxed);
}

pub struct GasSensor {
    channel: u32,
    total_reads: u32,
    failed_reads: u32,
}

impl GasSensor {
    pub fn new(channel: u32) -> Self {
        Self {
            channel,
            total_reads: 0,
            failed_reads: 0,
        }
    }

    /// Take one conversion.
    pub fn read(&mut self) -> Result<u16, SensorError> {
        self.total_reads = self.total_reads.saturating_add(1);
        let result = self.read_adc().and_then(|raw| {
            if raw > MAX_RANGE {
                Err(SensorError::OutOfRange)
            } else {
                Ok(raw)
            }
        });
        if result.is_err() {
            self.failed_reads = self.failed_reads.saturating_add(1);
        }
        result
    }

    /// ADC1 channel this sensor is wired to.
    pub fn channel(&self) -> u32 {
        self.channel
    }

    pub fn total_reads(&self) -> u32 {
        self.total_reads
    }

    pub fn failed_reads(&self) -> u32 {
        self.failed_reads
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Result<u16, SensorError> {
        hw_init::adc1_read(self.channel).ok_or(SensorError::AdcReadFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Result<u16, SensorError> {
        match SIM_GAS_ADC.load(Ordering::Relaxed) {
            SIM_READ_FAILED => Err(SensorError::AdcReadFailed),
            raw => u16::try_from(raw).map_err(|_| SensorError::OutOfRange),
        }
    }
}
