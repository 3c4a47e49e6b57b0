//! In-memory PWM channel for driver unit tests.

use embedded_hal::pwm::{self, ErrorKind, ErrorType, SetDutyCycle};

#[derive(Debug)]
pub struct FakePwmError;

impl pwm::Error for FakePwmError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Records the last raw duty written; `max_duty_cycle` is 255 so the raw
/// value equals the 8-bit command.
pub struct FakePwm {
    pub duty: u16,
    pub fail: bool,
}

impl FakePwm {
    pub fn new() -> Self {
        Self {
            duty: 0,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            duty: 0,
            fail: true,
        }
    }
}

impl ErrorType for FakePwm {
    type Error = FakePwmError;
}

impl SetDutyCycle for FakePwm {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        if self.fail {
            return Err(FakePwmError);
        }
        self.duty = duty;
        Ok(())
    }
}
