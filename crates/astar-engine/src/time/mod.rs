//! Time subsystem.
//!
//! Deadline-based timers for a single-threaded event loop. Nothing here reads
//! the clock: callers pass `now` in, the runtime sleeps until the earliest
//! `next_due()` and polls again on wake. That keeps every timer testable with
//! synthetic instants.

mod debounce;
mod timer;

pub use debounce::Debouncer;
pub use timer::RepeatingTimer;

use std::time::Instant;

/// Earliest of two optional deadlines.
#[inline]
pub fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
