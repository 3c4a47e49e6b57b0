//! RGB status indicator driver.
//!
//! Three PWM channels drive discrete R/G/B LEDs (or a common-cathode RGB
//! LED).  Each colour component 0–255 becomes a duty fraction of 255.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: three `hw_init::LedcChannel`s.
//! On host/test: any `SetDutyCycle` mock.

use embedded_hal::pwm::SetDutyCycle;

use crate::app::ports::Color;
use crate::error::OutputError;

pub struct StatusLed<R, G, B> {
    red: R,
    green: G,
    blue: B,
    current: Color,
}

impl<R, G, B> StatusLed<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    pub fn new(red: R, green: G, blue: B) -> Self {
        Self {
            red,
            green,
            blue,
            current: Color::Black,
        }
    }

    pub fn set_colour(&mut self, colour: Color) -> Result<(), OutputError> {
        let (r, g, b) = colour.rgb();
        self.red
            .set_duty_cycle_fraction(r.into(), 255)
            .map_err(|_| OutputError::PwmWriteFailed)?;
        self.green
            .set_duty_cycle_fraction(g.into(), 255)
            .map_err(|_| OutputError::PwmWriteFailed)?;
        self.blue
            .set_duty_cycle_fraction(b.into(), 255)
            .map_err(|_| OutputError::PwmWriteFailed)?;
        self.current = colour;
        Ok(())
    }

    pub fn off(&mut self) -> Result<(), OutputError> {
        self.set_colour(Color::Black)
    }

    pub fn current_colour(&self) -> Color {
        self.current
    }
}
