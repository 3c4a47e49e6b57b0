//! System service: the serialization layer in front of the engine.
//!
//! [`SystemService`] owns the [`Machine`] behind a single mutex.  Every
//! producer (gesture classifier task, power-on trigger, tests on other
//! threads) goes through [`SystemService::process_event`], which holds the
//! lock across guard evaluation, the action and the state commit.
//!
//! ```text
//!  button task ──┐
//!  power-on ─────┼──▶ process_event ──▶ [ lock ] ──▶ Machine ──▶ Board
//!  ...        ───┘        (blocks, no timeout)
//! ```
//!
//! There is no timeout: a caller waits for as long as the current action
//! takes, including its fixed delays, rather than risk interleaving two
//! actions' output writes.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::error;

use crate::app::ports::Board;
use crate::config::DeviceConfig;
use crate::error::ConfigError;
use crate::events::{Event, PressInfo};
use crate::fsm::observer::{MachineObserver, NoopObserver};
use crate::fsm::{Machine, State};

pub struct SystemService<H, O = NoopObserver> {
    machine: Mutex<Machine<H, O>>,
}

impl<H: Board> SystemService<H> {
    /// Validate `config` and build the service around a fresh machine.
    pub fn new(config: DeviceConfig, hw: H) -> Result<Self, ConfigError> {
        Self::with_observer(config, hw, NoopObserver)
    }
}

impl<H: Board, O: MachineObserver> SystemService<H, O> {
    pub fn with_observer(config: DeviceConfig, hw: H, observer: O) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            machine: Mutex::new(Machine::with_observer(config, hw, observer)),
        })
    }

    // ── Event entry point ─────────────────────────────────────

    /// Process one event to completion under the event lock.
    ///
    /// Blocks until the lock is available.  Returns `false` if the event
    /// was discarded.
    pub fn process_event(&self, event: Event) -> bool {
        self.lock().process_event(event)
    }

    pub fn request_power_on(&self) -> bool {
        self.process_event(Event::RequestPowerOn)
    }

    pub fn plus_button_pressed(&self, duration: Duration) -> bool {
        self.process_event(Event::PlusButtonPressed { duration })
    }

    pub fn minus_button_pressed(&self, duration: Duration) -> bool {
        self.process_event(Event::MinusButtonPressed { duration })
    }

    pub fn both_buttons_pressed(&self, plus: PressInfo, minus: PressInfo) -> bool {
        self.process_event(Event::BothButtonsPressed { plus, minus })
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current state.  Waits for any in-flight event to finish.
    pub fn state(&self) -> State {
        self.lock().state()
    }

    /// Current fan level.  Waits for any in-flight event to finish.
    pub fn fan_level(&self) -> u8 {
        self.lock().fan_level()
    }

    /// Run `f` against the hardware under the event lock.
    ///
    /// Used by the main loop for periodic output upkeep (strobe wave) so
    /// that it never interleaves with an action's writes.
    pub fn with_hardware<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        f(self.lock().hardware_mut())
    }

    /// Tear down the lock and hand back the machine.
    pub fn into_inner(self) -> Machine<H, O> {
        self.machine
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // ── Internal ──────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, Machine<H, O>> {
        self.machine.lock().unwrap_or_else(|poisoned| {
            // An action panicked mid-sequence.  Outputs may be partially
            // written; keep serving events rather than wedge every producer.
            error!("event lock poisoned by a panicking action, recovering");
            poisoned.into_inner()
        })
    }
}
