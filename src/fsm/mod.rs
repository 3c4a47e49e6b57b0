//! Event-driven power state machine.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Machine                                                 │
//! │                                                          │
//! │  Event ─▶ states::select ─▶ actions::run ─▶ commit state │
//! │              (guards)         (&mut ctx)     (+ ε moves) │
//! │                                                          │
//! │  MachineContext { fan_level, config, hw: impl Board }    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine owns the current [`State`] and the [`MachineContext`].  It
//! is not synchronised itself; [`SystemService`](crate::app::service::SystemService)
//! wraps it in the event lock.

pub mod actions;
pub mod context;
pub mod guards;
pub mod observer;
pub mod states;

use core::fmt;

use log::{debug, info};

use crate::app::ports::Board;
use crate::config::DeviceConfig;
use crate::events::Event;
use context::MachineContext;
use observer::{MachineObserver, NoopObserver};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    /// Initial state; only `RequestPowerOn` (or a chord) does anything.
    #[default]
    Off,
    /// Transient: left immediately for `ManualMode`.
    On,
    /// Steady operating state; plus/minus ramp the fan.
    ManualMode,
    /// Terminal; the device has halted.
    ShutDown,
}

impl State {
    pub fn is_terminal(self) -> bool {
        self == Self::ShutDown
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::On => write!(f, "on"),
            Self::ManualMode => write!(f, "manual_mode"),
            Self::ShutDown => write!(f, "shut_down"),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct Machine<H, O = NoopObserver> {
    state: State,
    ctx: MachineContext<H>,
    observer: O,
}

impl<H: Board> Machine<H> {
    /// Build a machine in [`State::Off`] with the no-op observer.
    ///
    /// `config` must already be validated.
    pub fn new(config: DeviceConfig, hw: H) -> Self {
        Self::with_observer(config, hw, NoopObserver)
    }
}

impl<H: Board, O: MachineObserver> Machine<H, O> {
    pub fn with_observer(config: DeviceConfig, hw: H, observer: O) -> Self {
        Self {
            state: State::Off,
            ctx: MachineContext::new(config, hw),
            observer,
        }
    }

    /// Consume one event: select a rule, run its action, commit the state.
    ///
    /// Returns `false` when the event matched no rule and was discarded.
    pub fn process_event(&mut self, event: Event) -> bool {
        self.observer.on_process_event(self.state, &event);

        let selected = states::select(
            self.state,
            &event,
            &self.ctx.config.thresholds,
            &mut self.observer,
        );
        let Some(transition) = selected else {
            debug!("{} discarded in {}", event.name(), self.state);
            return false;
        };

        self.observer.on_action(&transition.action, &event);
        actions::run(transition.action, &mut self.ctx);

        if let Some(target) = transition.target {
            self.enter(target);
        }
        true
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Current commanded fan level (0–100).
    pub fn fan_level(&self) -> u8 {
        self.ctx.fan_level()
    }

    pub fn config(&self) -> &DeviceConfig {
        self.ctx.config()
    }

    pub fn hardware(&self) -> &H {
        self.ctx.hardware()
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        self.ctx.hardware_mut()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_parts(self) -> (H, O) {
        (self.ctx.into_hardware(), self.observer)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    /// Commit `target`, then follow completion transitions.
    fn enter(&mut self, target: State) {
        let mut next = Some(target);
        while let Some(to) = next {
            let from = self.state;
            self.state = to;
            self.observer.on_transition(from, to);
            info!("FSM transition: {} -> {}", from, to);
            next = states::completion(to);
        }
    }
}
