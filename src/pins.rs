//! GPIO / peripheral pin assignments for the fan controller board.
//!
//! Every driver references this module rather than hard-coding pin
//! numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Fan motor (low-side MOSFET)
// ---------------------------------------------------------------------------

/// LEDC PWM channel for fan speed control.
pub const FAN_PWM_GPIO: i32 = 1;

// ---------------------------------------------------------------------------
// Strobe LED (constant-current driver, PWM dimming input)
// ---------------------------------------------------------------------------

pub const STROBE_PWM_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Status LED (discrete RGB, common cathode)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 11;
pub const LED_G_GPIO: i32 = 12;
pub const LED_B_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// Buttons (active-low with internal pull-up)
// ---------------------------------------------------------------------------

/// Both buttons must be RTC-capable: they are the deep-sleep wake source.
pub const PLUS_BUTTON_GPIO: i32 = 5;
pub const MINUS_BUTTON_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC base frequency for the fan motor (25 kHz, above audible range).
pub const FAN_PWM_FREQ_HZ: u32 = 25_000;
/// LEDC base frequency for the strobe driver and status LED.
pub const LIGHT_PWM_FREQ_HZ: u32 = 1_000;
