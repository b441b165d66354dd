//! Unified error types for the GasWatch firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level loop's error handling uniform. All variants are `Copy` so they
//! can be passed through the lifecycle controller without allocation.

use core::fmt;

use crate::app::ports::ConfigError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The gas sensor could not be read or returned out-of-range data.
    Sensor(SensorError),
    /// A communication subsystem failed.
    Comms(CommsError),
    /// Boot-time verification failed; the device is halted.
    Init(InitFault),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Corrupted => Self::Config("override document corrupted"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC read returned an error or timed out.
    AdcReadFailed,
    /// Reading is outside `0..=MAX_RANGE`.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// Network association failed.
    ConnectFailed,
    /// Link dropped or was never established.
    Disconnected,
    /// Outbound message could not be handed to the transport.
    SendFailed,
    /// Round-trip ping got no reply.
    PingFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed => write!(f, "network connect failed"),
            Self::Disconnected => write!(f, "network disconnected"),
            Self::SendFailed => write!(f, "message send failed"),
            Self::PingFailed => write!(f, "latency ping failed"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Fatal initialisation faults
// ---------------------------------------------------------------------------

/// Conditions that stop the device before warmup. There is no automatic
/// recovery; a physical restart is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitFault {
    /// Cold reading failed or fell outside `MIN_PLAUSIBLE..=MAX_PLAUSIBLE`.
    /// Carries the raw value when one was obtained.
    SensorImplausible(Option<u16>),
    /// The network could not be joined at boot.
    ConnectivityUnavailable,
}

impl fmt::Display for InitFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SensorImplausible(Some(raw)) => write!(f, "sensor implausible (raw={raw})"),
            Self::SensorImplausible(None) => write!(f, "sensor unreadable"),
            Self::ConnectivityUnavailable => write!(f, "connectivity unavailable"),
        }
    }
}

impl From<InitFault> for Error {
    fn from(e: InitFault) -> Self {
        Self::Init(e)
    }
}
