//! Strobe light driver.
//!
//! A high-power LED on one PWM channel, flashed as a square wave: lit for
//! half the period at the commanded intensity, dark for the other half.
//! The main loop calls [`StrobeDriver::tick`] to advance the wave.
//!
//! `is_on` reports the *commanded* state, not the instantaneous phase:
//! a strobe in its dark half-period is still on.

use core::time::Duration;

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::error::OutputError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrobeState {
    Off,
    On {
        intensity: u8,
        period: Duration,
        lit: bool,
        /// Start of the current half-period; set on the first tick.
        phase_start: Option<Duration>,
    },
}

pub struct StrobeDriver<P> {
    pwm: P,
    state: StrobeState,
}

impl<P: SetDutyCycle> StrobeDriver<P> {
    pub fn new(pwm: P) -> Self {
        Self {
            pwm,
            state: StrobeState::Off,
        }
    }

    pub fn on(&mut self, intensity: u8, period: Duration) -> Result<(), OutputError> {
        if intensity == 0 || period.is_zero() {
            warn!("strobe on() with zero intensity or period, turning off");
            return self.off();
        }
        self.write(intensity)?;
        self.state = StrobeState::On {
            intensity,
            period,
            lit: true,
            phase_start: None,
        };
        Ok(())
    }

    pub fn off(&mut self) -> Result<(), OutputError> {
        // Record the state first: even if the write fails, nobody should
        // believe the strobe is still commanded on.
        self.state = StrobeState::Off;
        self.write(0)
    }

    /// Advance the flash wave to `now`.
    pub fn tick(&mut self, now: Duration) -> Result<(), OutputError> {
        let StrobeState::On {
            intensity,
            period,
            lit,
            phase_start,
        } = self.state
        else {
            return Ok(());
        };

        let Some(start) = phase_start else {
            self.state = StrobeState::On {
                intensity,
                period,
                lit,
                phase_start: Some(now),
            };
            return Ok(());
        };

        if now.saturating_sub(start) < period / 2 {
            return Ok(());
        }

        let lit = !lit;
        self.write(if lit { intensity } else { 0 })?;
        self.state = StrobeState::On {
            intensity,
            period,
            lit,
            phase_start: Some(now),
        };
        Ok(())
    }

    pub fn is_on(&self) -> bool {
        matches!(self.state, StrobeState::On { .. })
    }

    pub fn state(&self) -> StrobeState {
        self.state
    }

    fn write(&mut self, raw: u8) -> Result<(), OutputError> {
        self.pwm
            .set_duty_cycle_fraction(raw.into(), 255)
            .map_err(|_| OutputError::PwmWriteFailed)
    }
}
