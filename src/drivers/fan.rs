//! Cooling fan motor driver.
//!
//! Variable-speed control through one PWM channel.  The commanded level
//! (percent, 0–100) is mapped into a raw 8-bit window `[min, max]`: level
//! 0 switches the motor off, level 1 starts at `min` so the motor never
//! sits in its stall band, level 100 is `max`.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: a `hw_init::LedcChannel`.
//! On host/test: any `SetDutyCycle` mock.

use embedded_hal::pwm::SetDutyCycle;

use crate::config::FanLimits;
use crate::error::OutputError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanState {
    Stopped,
    Running { level: u8, raw: u8 },
}

pub struct FanDriver<P> {
    pwm: P,
    limits: FanLimits,
    state: FanState,
}

impl<P: SetDutyCycle> FanDriver<P> {
    pub fn new(pwm: P) -> Self {
        Self {
            pwm,
            limits: FanLimits::default(),
            state: FanState::Stopped,
        }
    }

    /// Set the raw window.  Takes effect on the next `set_speed`.
    pub fn set_limits(&mut self, min: u8, max: u8) {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.limits = FanLimits { min, max };
    }

    pub fn set_speed(&mut self, level: u8) -> Result<(), OutputError> {
        let level = level.min(100);
        let raw = self.raw_for_level(level);
        self.pwm
            .set_duty_cycle_fraction(raw.into(), 255)
            .map_err(|_| OutputError::PwmWriteFailed)?;

        self.state = if level == 0 {
            FanState::Stopped
        } else {
            FanState::Running { level, raw }
        };
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), OutputError> {
        self.set_speed(0)
    }

    /// Raw 8-bit duty for a level in percent.
    pub fn raw_for_level(&self, level: u8) -> u8 {
        if level == 0 {
            return 0;
        }
        let span = u16::from(self.limits.max - self.limits.min);
        let scaled = span * u16::from(level.min(100)) / 100;
        self.limits.min + scaled as u8
    }

    pub fn state(&self) -> FanState {
        self.state
    }

    pub fn limits(&self) -> FanLimits {
        self.limits
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.state, FanState::Stopped)
    }
}
