//! Log-based machine observer.
//!
//! Implements [`MachineObserver`] by writing every engine hook to the
//! `log` facade (ESP-IDF logger on target, whatever the host installs in
//! tests).  Event arrivals and transitions log at `info`, guard results and
//! actions at `debug`.

use log::{debug, info};

use crate::events::Event;
use crate::fsm::State;
use crate::fsm::guards::Guard;
use crate::fsm::observer::MachineObserver;
use crate::fsm::states::Action;

/// Adapter that logs every engine hook to the serial console.
#[derive(Debug, Default)]
pub struct LogObserver;

impl LogObserver {
    pub fn new() -> Self {
        Self
    }
}

impl MachineObserver for LogObserver {
    fn on_process_event(&mut self, state: State, event: &Event) {
        info!("EVENT | {} in {} | {:?}", event.name(), state, event);
    }

    fn on_guard(&mut self, guard: Guard, event: &Event, passed: bool) {
        debug!(
            "GUARD | {} {} {}",
            guard,
            event.name(),
            if passed { "[OK]" } else { "[Reject]" }
        );
    }

    fn on_action(&mut self, action: &Action, event: &Event) {
        debug!("ACTION | {} on {}", action, event.name());
    }

    fn on_transition(&mut self, from: State, to: State) {
        info!("STATE | {} -> {}", from, to);
    }
}
