//! Mock board for integration tests.
//!
//! Records every output call so tests can assert on the full command
//! history without touching real GPIO/PWM registers.

use std::time::Duration;

use embedded_hal::delay::DelayNs;
use ventfan::app::ports::{Color, FanPort, IndicatorPort, PlatformPort, StrobePort};
use ventfan::events::Event;
use ventfan::fsm::State;
use ventfan::fsm::guards::Guard;
use ventfan::fsm::observer::MachineObserver;
use ventfan::fsm::states::Action;

// ── Output call record ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetColor(Color),
    IndicatorOff,
    FanLimits { min: u8, max: u8 },
    FanSpeed(u8),
    StrobeOn { intensity: u8, period: Duration },
    StrobeOff,
    SuspendScheduling,
    MaskInterrupts,
    Settle(u32),
    WakeFromButtons,
    Halt,
}

// ── MockBoard ─────────────────────────────────────────────────

pub struct MockBoard {
    pub calls: Vec<Call>,
    pub slept_ns: u64,
    strobe_on: bool,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            slept_ns: 0,
            strobe_on: false,
        }
    }

    pub fn last_call(&self) -> Option<&Call> {
        self.calls.last()
    }

    pub fn last_fan_speed(&self) -> Option<u8> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::FanSpeed(level) => Some(*level),
            _ => None,
        })
    }

    pub fn strobe_on(&self) -> bool {
        self.strobe_on
    }

    pub fn halted(&self) -> bool {
        self.calls.contains(&Call::Halt)
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorPort for MockBoard {
    fn set_color(&mut self, color: Color) {
        self.calls.push(Call::SetColor(color));
    }

    fn indicator_off(&mut self) {
        self.calls.push(Call::IndicatorOff);
    }
}

impl FanPort for MockBoard {
    fn set_fan_limits(&mut self, min: u8, max: u8) {
        self.calls.push(Call::FanLimits { min, max });
    }

    fn set_fan_speed(&mut self, level: u8) {
        self.calls.push(Call::FanSpeed(level));
    }
}

impl StrobePort for MockBoard {
    fn strobe_on(&mut self, intensity: u8, period: Duration) {
        self.strobe_on = true;
        self.calls.push(Call::StrobeOn { intensity, period });
    }

    fn strobe_off(&mut self) {
        self.strobe_on = false;
        self.calls.push(Call::StrobeOff);
    }

    fn is_strobe_on(&self) -> bool {
        self.strobe_on
    }
}

impl PlatformPort for MockBoard {
    fn suspend_scheduling(&mut self) {
        self.calls.push(Call::SuspendScheduling);
    }

    fn mask_interrupts(&mut self) {
        self.calls.push(Call::MaskInterrupts);
    }

    fn settle(&mut self, iterations: u32) {
        self.calls.push(Call::Settle(iterations));
    }

    fn enable_wake_from_buttons(&mut self) {
        self.calls.push(Call::WakeFromButtons);
    }

    fn enter_lowest_power_halt(&mut self) {
        self.calls.push(Call::Halt);
    }
}

impl DelayNs for MockBoard {
    fn delay_ns(&mut self, ns: u32) {
        self.slept_ns += u64::from(ns);
        // Give other producer threads a chance to contend for the lock.
        std::thread::yield_now();
    }
}

// ── Hook trace ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Hook {
    Process(State, &'static str),
    Guard(Guard, bool),
    Action(Action),
    Transition(State, State),
}

/// Observer that records every engine hook in order.
#[derive(Default)]
pub struct HookTrace {
    pub hooks: Vec<Hook>,
}

impl MachineObserver for HookTrace {
    fn on_process_event(&mut self, state: State, event: &Event) {
        self.hooks.push(Hook::Process(state, event.name()));
    }

    fn on_guard(&mut self, guard: Guard, _event: &Event, passed: bool) {
        self.hooks.push(Hook::Guard(guard, passed));
    }

    fn on_action(&mut self, action: &Action, _event: &Event) {
        self.hooks.push(Hook::Action(*action));
    }

    fn on_transition(&mut self, from: State, to: State) {
        self.hooks.push(Hook::Transition(from, to));
    }
}
