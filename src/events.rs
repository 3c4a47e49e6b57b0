//! Input event model and the ISR-side button edge queue.
//!
//! Events are produced by:
//! - The dual-button gesture classifier (plus, minus, both-buttons chords)
//! - The power-on trigger (first wake / boot)
//!
//! and consumed, one at a time, by [`SystemService`](crate::app::service::SystemService).
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ GPIO ISR    │────▶│  Edge Queue  │────▶│  Gesture     │────▶│ SystemService │
//! │ (plus/minus)│     │  (lock-free) │     │  classifier  │     │ (event lock)  │
//! └─────────────┘     └──────────────┘     └──────────────┘     └───────────────┘
//!                                                 power-on trigger ──────▲
//! ```

use core::time::Duration;

use heapless::mpmc::Q16;

// ── Event model ───────────────────────────────────────────────

/// Classification of a completed press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PressKind {
    ShortPress,
    LongPress,
}

/// One completed (or still held, when re-delivered) button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressInfo {
    pub kind: PressKind,
    pub duration: Duration,
}

impl PressInfo {
    pub const fn new(kind: PressKind, duration: Duration) -> Self {
        Self { kind, duration }
    }

    pub const fn long(duration: Duration) -> Self {
        Self::new(PressKind::LongPress, duration)
    }

    pub const fn short(duration: Duration) -> Self {
        Self::new(PressKind::ShortPress, duration)
    }

    pub fn is_long(&self) -> bool {
        self.kind == PressKind::LongPress
    }
}

/// The closed set of inputs the power state machine reacts to.
///
/// Each value is consumed exactly once by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    RequestPowerOn,
    PlusButtonPressed { duration: Duration },
    MinusButtonPressed { duration: Duration },
    BothButtonsPressed { plus: PressInfo, minus: PressInfo },
}

impl Event {
    /// Short name used in log lines and observer callbacks.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RequestPowerOn => "request_power_on",
            Self::PlusButtonPressed { .. } => "plus_button_pressed",
            Self::MinusButtonPressed { .. } => "minus_button_pressed",
            Self::BothButtonsPressed { .. } => "both_buttons_pressed",
        }
    }
}

// ── Raw button edges ──────────────────────────────────────────

/// Physical buttons on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Plus,
    Minus,
}

/// A debounced level change on one button, timestamped with uptime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEdge {
    pub button: Button,
    pub pressed: bool,
    pub at: Duration,
}

// ── Lock-free MPMC edge queue ─────────────────────────────────
//
// Both button ISRs produce, the input task consumes.  ISRs may not take
// the event lock, so they only ever touch this queue.

static EDGE_QUEUE: Q16<ButtonEdge> = Q16::new();

/// Push an edge into the queue.
/// Safe to call from ISR context (lock-free).
/// Returns `false` if the queue is full (edge dropped).
pub fn push_edge(edge: ButtonEdge) -> bool {
    EDGE_QUEUE.enqueue(edge).is_ok()
}

/// Pop the oldest pending edge.
pub fn pop_edge() -> Option<ButtonEdge> {
    EDGE_QUEUE.dequeue()
}

/// Drain all pending edges into a callback, in FIFO order.
pub fn drain_edges(mut handler: impl FnMut(ButtonEdge)) {
    while let Some(edge) = pop_edge() {
        handler(edge);
    }
}
