//! Dual-button gesture classifier.
//!
//! ## Input
//!
//! Debounced edges `(button, pressed, at)` drained from the ISR edge
//! queue (see [`crate::events`]), plus periodic [`ButtonGestures::poll`]
//! calls from the input task with the current uptime.
//!
//! ## Gesture detection
//!
//! | Gesture        | Condition                                   | Event                    |
//! |----------------|---------------------------------------------|--------------------------|
//! | Single press   | One button pressed and released alone       | `Plus/MinusButtonPressed`|
//! | Held press     | One button held; every `repeat_interval`    | `Plus/MinusButtonPressed`|
//! | Chord          | Both down at once; on the last release      | `BothButtonsPressed`     |
//!
//! A press is a long press when it lasted at least `long_press`.  A chord
//! produces exactly one event and never any single-button events once it
//! has formed.
//!
//! ## Debounce
//!
//! [`button_isr_handler`] runs in the GPIO ISR.  It drops repeats of the
//! current level and any edge within [`DEBOUNCE_MS`] of the last accepted
//! one on the same button, then pushes the survivor to the edge queue.
//! A level is only committed once its edge is queued.
//!
//! The ISR alone can lose a real edge (a release inside the bounce window,
//! or a full queue), so the input loop also calls [`resync_levels`] with
//! the pin levels read back from hardware.  That re-offers the true level
//! through the same debouncer and queues whatever edge was missed.

use core::sync::atomic::{AtomicU32, Ordering};
use core::time::Duration;

use crate::config::ButtonTiming;
use crate::events::{Button, ButtonEdge, Event, PressInfo, PressKind, push_edge};

/// Contact-bounce window.
pub const DEBOUNCE_MS: u32 = 50;

const LEVEL_BIT: u32 = 1;
const STAMP_MASK: u32 = u32::MAX >> 1;

/// Lock-free debounce state for one button, shared between its ISR and
/// the input loop.
///
/// Bit 0 holds the committed level, the upper bits the (31-bit, wrapping)
/// millisecond stamp of the last accepted edge, so both change together.
pub struct Debouncer {
    state: AtomicU32,
}

impl Debouncer {
    pub const fn new() -> Self {
        Self {
            state: AtomicU32::new(0),
        }
    }

    /// Offer a level seen at `now_ms`.
    ///
    /// When it is a real change outside the bounce window, `deliver` is
    /// called and the level is committed only if it returns `true`.  A
    /// rejected or undelivered level leaves the committed one untouched,
    /// so offering it again later succeeds.
    pub fn accept(&self, pressed: bool, now_ms: u32, deliver: impl FnOnce() -> bool) -> bool {
        let current = self.state.load(Ordering::Acquire);
        if (current & LEVEL_BIT != 0) == pressed {
            return false;
        }
        let elapsed = (now_ms & STAMP_MASK).wrapping_sub(current >> 1) & STAMP_MASK;
        if elapsed < DEBOUNCE_MS {
            return false;
        }
        let next = ((now_ms & STAMP_MASK) << 1) | u32::from(pressed);
        if self
            .state
            .compare_exchange(current, next, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        if deliver() {
            return true;
        }
        // Roll back unless a newer edge already replaced ours.
        let _ = self
            .state
            .compare_exchange(next, current, Ordering::AcqRel, Ordering::Acquire);
        false
    }

    /// Last committed level.
    pub fn is_down(&self) -> bool {
        self.state.load(Ordering::Acquire) & LEVEL_BIT != 0
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

static PLUS_DEBOUNCE: Debouncer = Debouncer::new();
static MINUS_DEBOUNCE: Debouncer = Debouncer::new();

fn debouncer(button: Button) -> &'static Debouncer {
    match button {
        Button::Plus => &PLUS_DEBOUNCE,
        Button::Minus => &MINUS_DEBOUNCE,
    }
}

/// ISR handler: register on both edges of each button GPIO.
///
/// Lock-free; returns `true` if the edge was queued.
pub fn button_isr_handler(button: Button, pressed: bool, now_ms: u32) -> bool {
    debouncer(button).accept(pressed, now_ms, || {
        push_edge(ButtonEdge {
            button,
            pressed,
            at: Duration::from_millis(now_ms.into()),
        })
    })
}

/// Re-offer the hardware level of both buttons.  Called from the input
/// loop before draining the edge queue.
pub fn resync_levels(now_ms: u32, mut is_pressed: impl FnMut(Button) -> bool) {
    for button in [Button::Plus, Button::Minus] {
        button_isr_handler(button, is_pressed(button), now_ms);
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Track {
    /// Uptime of the press, while held.
    down_since: Option<Duration>,
    /// Last time a held press was (re-)delivered.
    last_delivery: Duration,
    /// A held press was already delivered at least once.
    repeated: bool,
    /// This side's completed press, while waiting for the other side of a chord.
    released: Option<PressInfo>,
}

impl Track {
    fn is_down(&self) -> bool {
        self.down_since.is_some()
    }
}

pub struct ButtonGestures {
    timing: ButtonTiming,
    plus: Track,
    minus: Track,
    chord: bool,
}

impl ButtonGestures {
    pub fn new(timing: ButtonTiming) -> Self {
        Self {
            timing,
            plus: Track::default(),
            minus: Track::default(),
            chord: false,
        }
    }

    /// Feed one debounced edge.  Returns the event it completes, if any.
    pub fn on_edge(&mut self, edge: ButtonEdge) -> Option<Event> {
        if edge.pressed {
            self.press(edge.button, edge.at);
            None
        } else {
            self.release(edge.button, edge.at)
        }
    }

    /// Re-deliver a single held button every `repeat_interval`.
    pub fn poll(&mut self, now: Duration) -> Option<Event> {
        if self.chord {
            return None;
        }
        let interval = self.timing.repeat_interval();
        for button in [Button::Plus, Button::Minus] {
            let track = self.track_mut(button);
            let Some(since) = track.down_since else {
                continue;
            };
            if now.saturating_sub(track.last_delivery) >= interval {
                track.last_delivery = now;
                track.repeated = true;
                return Some(single(button, now.saturating_sub(since)));
            }
        }
        None
    }

    /// `true` while either button is held.
    pub fn is_busy(&self) -> bool {
        self.plus.is_down() || self.minus.is_down() || self.chord
    }

    fn press(&mut self, button: Button, at: Duration) {
        let other_down = self.track(other(button)).is_down();
        let track = self.track_mut(button);
        if track.is_down() {
            return;
        }
        track.down_since = Some(at);
        track.last_delivery = at;
        track.repeated = false;
        if other_down {
            self.chord = true;
        }
    }

    fn release(&mut self, button: Button, at: Duration) -> Option<Event> {
        let long_press = self.timing.long_press();
        let track = self.track_mut(button);
        let since = track.down_since.take()?;
        let duration = at.saturating_sub(since);
        let repeated = track.repeated;

        if !self.chord {
            return (!repeated).then(|| single(button, duration));
        }

        let kind = if duration >= long_press {
            PressKind::LongPress
        } else {
            PressKind::ShortPress
        };
        self.track_mut(button).released = Some(PressInfo::new(kind, duration));

        if self.track(other(button)).is_down() {
            return None;
        }

        self.chord = false;
        let plus = self.plus.released.take();
        let minus = self.minus.released.take();
        match (plus, minus) {
            (Some(plus), Some(minus)) => Some(Event::BothButtonsPressed { plus, minus }),
            _ => None,
        }
    }

    fn track(&self, button: Button) -> &Track {
        match button {
            Button::Plus => &self.plus,
            Button::Minus => &self.minus,
        }
    }

    fn track_mut(&mut self, button: Button) -> &mut Track {
        match button {
            Button::Plus => &mut self.plus,
            Button::Minus => &mut self.minus,
        }
    }
}

fn other(button: Button) -> Button {
    match button {
        Button::Plus => Button::Minus,
        Button::Minus => Button::Plus,
    }
}

fn single(button: Button, duration: Duration) -> Event {
    match button {
        Button::Plus => Event::PlusButtonPressed { duration },
        Button::Minus => Event::MinusButtonPressed { duration },
    }
}
