//! Device configuration parameters
//!
//! All tunable parameters for the fan controller: dual-button hold
//! thresholds, fan ramp rate, action timing, and output constants.
//! Durations are stored in milliseconds so the struct serialises to a
//! compact, human-editable JSON document.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Gesture and ramp thresholds consulted by the guard predicates and the
/// fan actions.  Immutable once the machine is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Both buttons held at least this long → power off (ms).
    pub both_buttons_power_off_hold_ms: u32,
    /// Both buttons held at least this long (but short of power-off) → toggle strobe (ms).
    pub both_buttons_toggle_strobe_hold_ms: u32,
    /// Each full multiple of this press duration adds one step to the ramp rate (ms).
    pub button_change_rate_threshold_ms: u32,
    /// Upper bound on fan steps applied by a single press.
    pub button_max_change_rate: u32,
}

impl Thresholds {
    pub fn power_off_hold(&self) -> Duration {
        Duration::from_millis(self.both_buttons_power_off_hold_ms as u64)
    }

    pub fn toggle_strobe_hold(&self) -> Duration {
        Duration::from_millis(self.both_buttons_toggle_strobe_hold_ms as u64)
    }

    pub fn change_rate_threshold(&self) -> Duration {
        Duration::from_millis(self.button_change_rate_threshold_ms as u64)
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            both_buttons_power_off_hold_ms: 5000,
            both_buttons_toggle_strobe_hold_ms: 1000,
            button_change_rate_threshold_ms: 500,
            button_max_change_rate: 5,
        }
    }
}

/// Fixed delays embedded in the action handlers.
///
/// These run while the event lock is held and double as rate limiting:
/// a held button can never ramp the fan faster than one step per
/// `fan_ramp_hold_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionTiming {
    /// Startup blink on-phase and off-phase length (ms).
    pub startup_blink_ms: u32,
    /// Number of startup blink cycles.
    pub startup_blink_count: u8,
    /// Hold after a fan step that stayed inside the range (ms).
    pub fan_ramp_hold_ms: u32,
    /// Hold after a fan step that hit 0 or 100 (ms).
    pub fan_limit_hold_ms: u32,
    /// Settle delay after toggling the strobe (ms).
    pub strobe_settle_ms: u32,
    /// Busy-wait iterations during power-off, with interrupts masked.
    pub power_off_settle_iterations: u32,
}

impl Default for ActionTiming {
    fn default() -> Self {
        Self {
            startup_blink_ms: 50,
            startup_blink_count: 3,
            fan_ramp_hold_ms: 25,
            fan_limit_hold_ms: 10,
            strobe_settle_ms: 1000,
            power_off_settle_iterations: 10_000_000,
        }
    }
}

/// Raw 8-bit PWM bounds the fan level (1–100) is mapped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanLimits {
    pub min: u8,
    pub max: u8,
}

impl Default for FanLimits {
    fn default() -> Self {
        // Below ~20% duty the motor stalls instead of spinning slowly.
        Self { min: 50, max: 255 }
    }
}

/// Strobe output when toggled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrobeSettings {
    pub intensity: u8,
    pub period_ms: u32,
}

impl StrobeSettings {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms as u64)
    }
}

impl Default for StrobeSettings {
    fn default() -> Self {
        Self {
            intensity: 255,
            period_ms: 100,
        }
    }
}

/// Gesture classifier timing (see [`crate::drivers::button`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonTiming {
    /// Presses at least this long are classified as long presses (ms).
    pub long_press_ms: u32,
    /// While a single button is held, a press is re-delivered this often (ms).
    pub repeat_interval_ms: u32,
}

impl ButtonTiming {
    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms as u64)
    }

    pub fn repeat_interval(&self) -> Duration {
        Duration::from_millis(self.repeat_interval_ms as u64)
    }
}

impl Default for ButtonTiming {
    fn default() -> Self {
        Self {
            long_press_ms: 800,
            repeat_interval_ms: 100,
        }
    }
}

/// Complete device configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub thresholds: Thresholds,
    pub timing: ActionTiming,
    pub fan: FanLimits,
    pub strobe: StrobeSettings,
    pub buttons: ButtonTiming,
}

impl DeviceConfig {
    /// Parse a JSON override.  Missing sections fall back to defaults;
    /// the result is validated before it is returned.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would make the transition table ambiguous
    /// or the fan arithmetic degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        if t.both_buttons_toggle_strobe_hold_ms >= t.both_buttons_power_off_hold_ms {
            return Err(ConfigError::ValidationFailed(
                "toggle-strobe hold must be shorter than power-off hold",
            ));
        }
        if t.button_change_rate_threshold_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "button change rate threshold must be non-zero",
            ));
        }
        if t.button_max_change_rate == 0 {
            return Err(ConfigError::ValidationFailed(
                "button max change rate must be non-zero",
            ));
        }
        if self.fan.min > self.fan.max {
            return Err(ConfigError::ValidationFailed("fan min limit above max limit"));
        }
        if self.strobe.period_ms == 0 {
            return Err(ConfigError::ValidationFailed("strobe period must be non-zero"));
        }
        Ok(())
    }
}
