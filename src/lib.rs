//! GasWatch firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod calibration;
pub mod config;
pub mod detection;
pub mod error;
pub mod fsm;
pub mod history;

pub mod pins;

// The ESP-IDF-only modules compile on host too; the actual hardware
// access is guarded by cfg attributes inside.
pub mod adapters;
pub mod drivers;
pub mod sensors;
