//! Action handlers run on transitions.
//!
//! Every handler is a plain `fn` over `&mut MachineContext`.  The fixed
//! delays below run while the caller holds the event lock; they bound how
//! fast a sustained press can drive the outputs, independent of how often
//! the button layer re-delivers the press.

use core::time::Duration;

use log::{info, warn};

use super::context::{MAX_FAN_LEVEL, MachineContext};
use super::states::Action;
use crate::app::ports::{Board, Color};
use crate::config::Thresholds;

/// Dispatch `action` to its handler.
pub fn run<H: Board>(action: Action, ctx: &mut MachineContext<H>) {
    match action {
        Action::Startup => startup(ctx),
        Action::IncreaseFan { duration } => increase_fan(ctx, duration),
        Action::DecreaseFan => decrease_fan(ctx),
        Action::ToggleStrobe => toggle_strobe(ctx),
        Action::PowerOff => power_off(ctx),
    }
}

/// Fan steps applied for a press held `duration`:
/// one step plus one per full change-rate threshold, capped at the max rate.
pub fn change_rate(duration: Duration, thresholds: &Thresholds) -> u32 {
    let per_step = u128::from(thresholds.button_change_rate_threshold_ms.max(1));
    let steps = duration.as_millis() / per_step + 1;
    steps.min(u128::from(thresholds.button_max_change_rate)) as u32
}

// ═══════════════════════════════════════════════════════════════════════════
//  Startup
// ═══════════════════════════════════════════════════════════════════════════

fn startup<H: Board>(ctx: &mut MachineContext<H>) {
    let timing = ctx.config.timing;
    for _ in 0..timing.startup_blink_count {
        ctx.hw.set_color(Color::STARTUP);
        ctx.hw.delay_ms(timing.startup_blink_ms);
        ctx.hw.indicator_off();
        ctx.hw.delay_ms(timing.startup_blink_ms);
    }

    let limits = ctx.config.fan;
    ctx.hw.set_fan_limits(limits.min, limits.max);
    let level = ctx.set_fan_level(0);
    ctx.hw.set_fan_speed(level);
    info!("startup: fan limits {}..={}, level 0", limits.min, limits.max);
}

// ═══════════════════════════════════════════════════════════════════════════
//  Fan ramp
// ═══════════════════════════════════════════════════════════════════════════

fn increase_fan<H: Board>(ctx: &mut MachineContext<H>, duration: Duration) {
    let timing = ctx.config.timing;
    let rate = change_rate(duration, &ctx.config.thresholds);
    let target = i32::from(ctx.fan_level).saturating_add(i32::try_from(rate).unwrap_or(i32::MAX));

    if target < i32::from(MAX_FAN_LEVEL) {
        let level = ctx.set_fan_level(target);
        ctx.hw.set_fan_speed(level);
        ctx.hw.set_color(Color::RAMP_UP);
        ctx.hw.delay_ms(timing.fan_ramp_hold_ms);
    } else {
        let level = ctx.set_fan_level(i32::from(MAX_FAN_LEVEL));
        ctx.hw.set_fan_speed(level);
        ctx.hw.set_color(Color::LIMIT);
        ctx.hw.delay_ms(timing.fan_limit_hold_ms);
    }

    ctx.hw.indicator_off();
}

fn decrease_fan<H: Board>(ctx: &mut MachineContext<H>) {
    let timing = ctx.config.timing;
    let target = i32::from(ctx.fan_level) - 1;

    if target > 0 {
        let level = ctx.set_fan_level(target);
        ctx.hw.set_fan_speed(level);
        ctx.hw.set_color(Color::RAMP_DOWN);
        ctx.hw.delay_ms(timing.fan_ramp_hold_ms);
    } else {
        let level = ctx.set_fan_level(0);
        ctx.hw.set_fan_speed(level);
        ctx.hw.set_color(Color::LIMIT);
        ctx.hw.delay_ms(timing.fan_limit_hold_ms);
    }

    ctx.hw.indicator_off();
}

// ═══════════════════════════════════════════════════════════════════════════
//  Strobe
// ═══════════════════════════════════════════════════════════════════════════

fn toggle_strobe<H: Board>(ctx: &mut MachineContext<H>) {
    if ctx.hw.is_strobe_on() {
        ctx.hw.strobe_off();
        info!("strobe off");
    } else {
        let strobe = ctx.config.strobe;
        ctx.hw.strobe_on(strobe.intensity, strobe.period());
        info!("strobe on ({} @ {}ms)", strobe.intensity, strobe.period_ms);
    }
    // A single sustained chord must not flip the strobe back and forth.
    ctx.hw.delay_ms(ctx.config.timing.strobe_settle_ms);
}

// ═══════════════════════════════════════════════════════════════════════════
//  Power-off
// ═══════════════════════════════════════════════════════════════════════════

/// Irreversible shutdown.
///
/// Step order is fixed: outputs are silenced before the wake source is
/// re-armed, and both happen before the halt.  Nothing may log once
/// interrupts are masked.
fn power_off<H: Board>(ctx: &mut MachineContext<H>) {
    warn!("power-off: silencing outputs and halting");

    ctx.hw.suspend_scheduling();
    ctx.hw.mask_interrupts();

    ctx.hw.set_color(Color::SHUTTING_DOWN);
    ctx.hw.strobe_off();
    let level = ctx.set_fan_level(0);
    ctx.hw.set_fan_speed(level);

    ctx.hw.settle(ctx.config.timing.power_off_settle_iterations);

    ctx.hw.enable_wake_from_buttons();
    ctx.hw.indicator_off();
    ctx.hw.enter_lowest_power_halt();
}
