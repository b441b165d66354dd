//! Sensor subsystem — the gas sensor driver and the sample type shared by
//! the calibration and detection paths.

pub mod gas;

use crate::config::MAX_RANGE;
use crate::error::SensorError;

/// One polled reading. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorSample {
    /// Clock reading (ms) at which the value was taken.
    pub timestamp_ms: u64,
    /// Raw value in `0..=MAX_RANGE`.
    pub value: u16,
}

impl SensorSample {
    /// Wrap a raw reading, rejecting values outside the sensor's range.
    pub fn new(timestamp_ms: u64, value: u16) -> Result<Self, SensorError> {
        if value > MAX_RANGE {
            return Err(SensorError::OutOfRange);
        }
        Ok(Self { timestamp_ms, value })
    }
}
