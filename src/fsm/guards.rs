//! Guard predicates for the dual-button chord.
//!
//! Pure functions of the event and the thresholds.  Power-off and
//! toggle-strobe are mutually exclusive by construction: the toggle guard
//! explicitly rejects anything the power-off guard accepts, so power-off
//! wins whenever both hold thresholds are exceeded.

use core::fmt;
use core::time::Duration;

use crate::config::Thresholds;
use crate::events::{Event, PressInfo};

/// Identity of a guard, reported to the [`MachineObserver`](super::observer::MachineObserver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    PowerOffHold,
    ToggleStrobeHold,
}

impl fmt::Display for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PowerOffHold => write!(f, "power_off_hold"),
            Self::ToggleStrobeHold => write!(f, "toggle_strobe_hold"),
        }
    }
}

/// Both sides long presses, both at least `hold`.
fn both_held_at_least(plus: &PressInfo, minus: &PressInfo, hold: Duration) -> bool {
    plus.is_long() && minus.is_long() && plus.duration >= hold && minus.duration >= hold
}

/// `true` iff `event` is a both-buttons chord held long enough to power off.
/// Any other event fails closed.
pub fn is_power_off_hold(event: &Event, thresholds: &Thresholds) -> bool {
    match event {
        Event::BothButtonsPressed { plus, minus } => {
            both_held_at_least(plus, minus, thresholds.power_off_hold())
        }
        _ => false,
    }
}

/// `true` iff `event` is a both-buttons chord held long enough to toggle the
/// strobe and not long enough to power off.
pub fn is_toggle_strobe_hold(event: &Event, thresholds: &Thresholds) -> bool {
    match event {
        Event::BothButtonsPressed { plus, minus } => {
            both_held_at_least(plus, minus, thresholds.toggle_strobe_hold())
                && !is_power_off_hold(event, thresholds)
        }
        _ => false,
    }
}
