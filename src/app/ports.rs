//! Port traits: the hexagonal boundary between the power state machine
//! and the outside world.
//!
//! ```text
//!   Engine ──▶ Port trait ──▶ Adapter ──▶ Driver ──▶ PWM / GPIO
//! ```
//!
//! Driven adapters (indicator LED, fan, strobe, platform power control)
//! implement these traits.  The [`Machine`](crate::fsm::Machine) consumes
//! them through the [`Board`] bundle, so the domain core never touches
//! hardware directly and runs unchanged against mocks on the host.
//!
//! Output ports are infallible by contract: adapters log driver failures
//! and carry on, because the action handlers have no recovery path.

use core::time::Duration;

use embedded_hal::delay::DelayNs;

// ───────────────────────────────────────────────────────────────
// Indicator colours
// ───────────────────────────────────────────────────────────────

/// Fixed palette of the RGB status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
    Green,
    Blue,
    Yellow,
    Magenta,
    Cyan,
    White,
}

impl Color {
    /// Startup blink.
    pub const STARTUP: Self = Self::Green;
    /// Fan stepped up inside its range.
    pub const RAMP_UP: Self = Self::Green;
    /// Fan stepped down inside its range.
    pub const RAMP_DOWN: Self = Self::Yellow;
    /// Fan hit 0 or 100.
    pub const LIMIT: Self = Self::Magenta;
    /// Power-off sequence in progress.
    pub const SHUTTING_DOWN: Self = Self::Cyan;

    /// (R, G, B), each 0–255.
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Black => (0, 0, 0),
            Self::Red => (255, 0, 0),
            Self::Green => (0, 255, 0),
            Self::Blue => (0, 0, 255),
            Self::Yellow => (255, 255, 0),
            Self::Magenta => (255, 0, 255),
            Self::Cyan => (0, 255, 255),
            Self::White => (255, 255, 255),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Output ports (driven adapters: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// RGB status indicator.
pub trait IndicatorPort {
    fn set_color(&mut self, color: Color);

    fn indicator_off(&mut self);
}

/// Cooling fan.
pub trait FanPort {
    /// Raw 8-bit PWM range that levels 1–100 are mapped into.
    fn set_fan_limits(&mut self, min: u8, max: u8);

    /// Commanded level in percent (0 = stopped, 100 = `max`).
    fn set_fan_speed(&mut self, level: u8);
}

/// Strobe light.
pub trait StrobePort {
    fn strobe_on(&mut self, intensity: u8, period: Duration);

    fn strobe_off(&mut self);

    fn is_strobe_on(&self) -> bool;
}

/// Platform power control used by the power-off sequence.
pub trait PlatformPort {
    /// Stop the scheduler from switching to other tasks.
    fn suspend_scheduling(&mut self);

    /// Mask all maskable interrupts on this core.
    fn mask_interrupts(&mut self);

    /// Spin for `iterations` without yielding and without relying on timers.
    ///
    /// Called with interrupts masked, so it must not sleep.  The default
    /// delegates to [`crate::power::busy_wait`].
    fn settle(&mut self, iterations: u32) {
        crate::power::busy_wait(iterations);
    }

    /// Re-arm the button GPIOs as the only wake source.
    fn enable_wake_from_buttons(&mut self);

    /// Enter the lowest-power halt.
    ///
    /// Never returns on hardware.  Host implementations may return; the
    /// engine then parks in its terminal state.
    fn enter_lowest_power_halt(&mut self);
}

/// Monotonic time since boot.
pub trait Clock {
    fn now(&self) -> Duration;
}

// ───────────────────────────────────────────────────────────────
// Board bundle
// ───────────────────────────────────────────────────────────────

/// Everything an action handler may drive: every output port plus a
/// blocking delay for the fixed holds between output changes.
pub trait Board: IndicatorPort + FanPort + StrobePort + PlatformPort + DelayNs {}

impl<T> Board for T where T: IndicatorPort + FanPort + StrobePort + PlatformPort + DelayNs {}
