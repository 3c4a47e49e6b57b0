//! Mutable context threaded through every action handler.
//!
//! `MachineContext` owns the fan accumulator, the immutable device
//! configuration and the board (all output ports).  Action handlers get
//! it by `&mut`, so there is no hidden global fan counter: whoever holds
//! the machine holds the only copy.

use crate::config::DeviceConfig;

/// Highest commanded fan level, in percent.
pub const MAX_FAN_LEVEL: u8 = 100;

pub struct MachineContext<H> {
    /// Current commanded fan level, always within `0..=MAX_FAN_LEVEL`.
    pub(crate) fan_level: u8,
    /// Device configuration, validated before the machine was built.
    pub(crate) config: DeviceConfig,
    /// Output ports and blocking delay.
    pub(crate) hw: H,
}

impl<H> MachineContext<H> {
    pub fn new(config: DeviceConfig, hw: H) -> Self {
        Self {
            fan_level: 0,
            config,
            hw,
        }
    }

    pub fn fan_level(&self) -> u8 {
        self.fan_level
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    pub fn into_hardware(self) -> H {
        self.hw
    }

    /// Store a new level, clamped into range.
    pub(crate) fn set_fan_level(&mut self, level: i32) -> u8 {
        self.fan_level = level.clamp(0, MAX_FAN_LEVEL as i32) as u8;
        self.fan_level
    }
}
