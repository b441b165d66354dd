//! Application core — pure domain orchestration, zero I/O.
//!
//! This module contains the rules around the sensor lifecycle: boot
//! checks, provisioning, command dispatch and notification plumbing.
//! All interaction with hardware and the network happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
