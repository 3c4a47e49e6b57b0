//! Observer hooks on the engine.
//!
//! The engine reports four extension points: an event arriving, a guard
//! being evaluated, an action about to run, and a state change.  Every
//! method has an empty default so observers only implement what they need.

use super::guards::Guard;
use super::states::Action;
use super::State;
use crate::events::Event;

pub trait MachineObserver {
    fn on_process_event(&mut self, _state: State, _event: &Event) {}

    fn on_guard(&mut self, _guard: Guard, _event: &Event, _passed: bool) {}

    fn on_action(&mut self, _action: &Action, _event: &Event) {}

    fn on_transition(&mut self, _from: State, _to: State) {}
}

/// Observer that ignores everything.  The engine's default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl MachineObserver for NoopObserver {}

impl<O: MachineObserver + ?Sized> MachineObserver for &mut O {
    fn on_process_event(&mut self, state: State, event: &Event) {
        (**self).on_process_event(state, event);
    }

    fn on_guard(&mut self, guard: Guard, event: &Event, passed: bool) {
        (**self).on_guard(guard, event, passed);
    }

    fn on_action(&mut self, action: &Action, event: &Event) {
        (**self).on_action(action, event);
    }

    fn on_transition(&mut self, from: State, to: State) {
        (**self).on_transition(from, to);
    }
}
