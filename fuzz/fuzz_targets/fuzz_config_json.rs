//! Fuzz target: `DeviceConfig::from_json`
//!
//! Feeds arbitrary UTF-8 to the config loader and verifies:
//! - No panics under any input
//! - Every config it accepts also passes `validate()`
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use ventfan::config::DeviceConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = DeviceConfig::from_json(json) {
        assert!(config.validate().is_ok(), "accepted an invalid config");
        assert!(
            config.thresholds.both_buttons_toggle_strobe_hold_ms
                < config.thresholds.both_buttons_power_off_hold_ms
        );
    }
});
