//! Transition table.
//!
//! ```text
//!  OFF ──[request_power_on / startup]──▶ ON ──(ε)──▶ MANUAL_MODE ─┐
//!                                                       ▲          │ plus  / increase_fan
//!                                                       └──────────┘ minus / decrease_fan
//!
//!  Any state ──[both_buttons_pressed, power_off_hold / power_off]──▶ SHUT_DOWN (terminal)
//!  Any state ──[both_buttons_pressed, toggle_strobe_hold / toggle_strobe]──▶ (unchanged)
//! ```
//!
//! Wildcard rules are evaluated first, power-off before toggle-strobe;
//! state-specific rules only afterwards.  An event that matches nothing
//! is discarded.

use core::fmt;
use core::time::Duration;

use super::guards::{self, Guard};
use super::observer::MachineObserver;
use super::State;
use crate::config::Thresholds;
use crate::events::Event;

/// Side effect attached to a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Startup,
    IncreaseFan { duration: Duration },
    DecreaseFan,
    ToggleStrobe,
    PowerOff,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Startup => write!(f, "startup"),
            Self::IncreaseFan { .. } => write!(f, "increase_fan"),
            Self::DecreaseFan => write!(f, "decrease_fan"),
            Self::ToggleStrobe => write!(f, "toggle_strobe"),
            Self::PowerOff => write!(f, "power_off"),
        }
    }
}

/// Selected rule: run `action`, then move to `target` (or stay when `None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub action: Action,
    pub target: Option<State>,
}

impl Transition {
    const fn to(action: Action, target: State) -> Self {
        Self {
            action,
            target: Some(target),
        }
    }

    const fn internal(action: Action) -> Self {
        Self {
            action,
            target: None,
        }
    }
}

/// Pick the rule for `event` in `state`.
///
/// Pure apart from reporting guard results to `observer`.
pub fn select(
    state: State,
    event: &Event,
    thresholds: &Thresholds,
    observer: &mut impl MachineObserver,
) -> Option<Transition> {
    if state == State::ShutDown {
        return None;
    }

    // ── Wildcard rules ────────────────────────────────────────
    if let Event::BothButtonsPressed { .. } = event {
        let power_off = guards::is_power_off_hold(event, thresholds);
        observer.on_guard(Guard::PowerOffHold, event, power_off);
        if power_off {
            return Some(Transition::to(Action::PowerOff, State::ShutDown));
        }

        let toggle = guards::is_toggle_strobe_hold(event, thresholds);
        observer.on_guard(Guard::ToggleStrobeHold, event, toggle);
        if toggle {
            return Some(Transition::internal(Action::ToggleStrobe));
        }
    }

    // ── State-specific rules ──────────────────────────────────
    match (state, event) {
        (State::Off, Event::RequestPowerOn) => Some(Transition::to(Action::Startup, State::On)),
        (State::ManualMode, Event::PlusButtonPressed { duration }) => Some(Transition::internal(
            Action::IncreaseFan {
                duration: *duration,
            },
        )),
        (State::ManualMode, Event::MinusButtonPressed { .. }) => {
            Some(Transition::internal(Action::DecreaseFan))
        }
        _ => None,
    }
}

/// Unconditional (ε) transition taken as soon as `state` is entered.
pub fn completion(state: State) -> Option<State> {
    match state {
        State::On => Some(State::ManualMode),
        _ => None,
    }
}
