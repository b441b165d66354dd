//! Fuzz target: `SystemConfig::from_json`
//!
//! Arbitrary override documents must either be rejected or produce a
//! configuration that passes validation.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use gaswatch::config::SystemConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = SystemConfig::from_json(json) {
        assert!(config.validate().is_ok());
    }
});
