//! Hardware adapter: bridges the output drivers to the domain port traits.
//!
//! Owns the status LED, fan and strobe drivers, the platform power
//! control and a blocking delay, and exposes them as one [`Board`].
//! Driver errors stop here: they are logged and the action carries on,
//! since output ports are infallible by contract.  Once the platform has
//! masked interrupts nothing is logged; failures are only counted.
//!
//! [`Board`]: crate::app::ports::Board

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::{Color, FanPort, IndicatorPort, PlatformPort, StrobePort};
use crate::drivers::fan::FanDriver;
use crate::drivers::status_led::StatusLed;
use crate::drivers::strobe::StrobeDriver;
use crate::error::OutputError;

/// Concrete adapter that combines all outputs behind the port traits.
pub struct HardwareAdapter<R, G, B, F, S, P, D> {
    led: StatusLed<R, G, B>,
    fan: FanDriver<F>,
    strobe: StrobeDriver<S>,
    platform: P,
    delay: D,
    interrupts_masked: bool,
    silenced_failures: u32,
}

impl<R, G, B, F, S, P, D> HardwareAdapter<R, G, B, F, S, P, D>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
    F: SetDutyCycle,
    S: SetDutyCycle,
{
    pub fn new(
        led: StatusLed<R, G, B>,
        fan: FanDriver<F>,
        strobe: StrobeDriver<S>,
        platform: P,
        delay: D,
    ) -> Self {
        Self {
            led,
            fan,
            strobe,
            platform,
            delay,
            interrupts_masked: false,
            silenced_failures: 0,
        }
    }

    /// Advance the strobe flash wave.  Called from the main loop.
    pub fn tick_strobe(&mut self, now: Duration) {
        let result = self.strobe.tick(now);
        self.report("strobe tick", result);
    }

    pub fn led(&self) -> &StatusLed<R, G, B> {
        &self.led
    }

    pub fn fan(&self) -> &FanDriver<F> {
        &self.fan
    }

    pub fn strobe(&self) -> &StrobeDriver<S> {
        &self.strobe
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }
}

impl<R, G, B, F, S, P, D> HardwareAdapter<R, G, B, F, S, P, D> {
    /// Driver failures dropped without a log line because interrupts
    /// were already masked.
    pub fn silenced_failures(&self) -> u32 {
        self.silenced_failures
    }

    fn report(&mut self, what: &str, result: Result<(), OutputError>) {
        let Err(e) = result else {
            return;
        };
        if self.interrupts_masked {
            self.silenced_failures = self.silenced_failures.saturating_add(1);
        } else {
            warn!("{}: {}", what, e);
        }
    }
}

// ── IndicatorPort ─────────────────────────────────────────────

impl<R, G, B, F, S, P, D> IndicatorPort for HardwareAdapter<R, G, B, F, S, P, D>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    fn set_color(&mut self, color: Color) {
        let result = self.led.set_colour(color);
        self.report("indicator", result);
    }

    fn indicator_off(&mut self) {
        let result = self.led.off();
        self.report("indicator off", result);
    }
}

// ── FanPort ───────────────────────────────────────────────────

impl<R, G, B, F, S, P, D> FanPort for HardwareAdapter<R, G, B, F, S, P, D>
where
    F: SetDutyCycle,
{
    fn set_fan_limits(&mut self, min: u8, max: u8) {
        self.fan.set_limits(min, max);
    }

    fn set_fan_speed(&mut self, level: u8) {
        let result = self.fan.set_speed(level);
        self.report("fan", result);
    }
}

// ── StrobePort ────────────────────────────────────────────────

impl<R, G, B, F, S, P, D> StrobePort for HardwareAdapter<R, G, B, F, S, P, D>
where
    S: SetDutyCycle,
{
    fn strobe_on(&mut self, intensity: u8, period: Duration) {
        let result = self.strobe.on(intensity, period);
        self.report("strobe on", result);
    }

    fn strobe_off(&mut self) {
        let result = self.strobe.off();
        self.report("strobe off", result);
    }

    fn is_strobe_on(&self) -> bool {
        self.strobe.is_on()
    }
}

// ── PlatformPort ──────────────────────────────────────────────

impl<R, G, B, F, S, P, D> PlatformPort for HardwareAdapter<R, G, B, F, S, P, D>
where
    P: PlatformPort,
{
    fn suspend_scheduling(&mut self) {
        self.platform.suspend_scheduling();
    }

    fn mask_interrupts(&mut self) {
        self.platform.mask_interrupts();
        self.interrupts_masked = true;
    }

    fn settle(&mut self, iterations: u32) {
        self.platform.settle(iterations);
    }

    fn enable_wake_from_buttons(&mut self) {
        self.platform.enable_wake_from_buttons();
    }

    fn enter_lowest_power_halt(&mut self) {
        self.platform.enter_lowest_power_halt();
    }
}

// ── Delay ─────────────────────────────────────────────────────

impl<R, G, B, F, S, P, D> DelayNs for HardwareAdapter<R, G, B, F, S, P, D>
where
    D: DelayNs,
{
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_ns(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
