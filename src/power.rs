//! Low-level power helpers.
//!
//! The power-off sequence runs with interrupts masked, so it cannot use
//! any timer-backed sleep: the tick interrupt that would wake it never
//! fires.  The settle delay is therefore a plain counted spin.

use core::hint::{black_box, spin_loop};

/// Spin for `iterations` loop turns.
///
/// Non-preemptible by construction (no yield, no syscall) and independent
/// of interrupt-driven timers.  `black_box` keeps the optimiser from
/// collapsing the loop.  Wall-clock duration depends on CPU frequency;
/// callers pick the count empirically.
#[inline(never)]
pub fn busy_wait(iterations: u32) {
    let mut i = 0u32;
    while black_box(i) != iterations {
        spin_loop();
        i += 1;
    }
}
