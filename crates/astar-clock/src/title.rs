//! Window title: width-dependent label plus the current `HH:MM`.

use std::time::{Duration, Instant};

use chrono::NaiveTime;

use astar_engine::time::{earliest, Debouncer, RepeatingTimer};

pub const TITLE_INTERVAL: Duration = Duration::from_secs(1);
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(200);

/// Label for a client area `width` logical pixels wide.
pub fn label_for_width(width: f32) -> &'static str {
    if width < 200.0 {
        "Analog Clock"
    } else if width < 400.0 {
        "AStar — Analog Clock"
    } else if width < 800.0 {
        "AStar Dev — Analog Clock"
    } else {
        "AStar Development — Analog Clock"
    }
}

pub fn title_for(width: f32, now: NaiveTime) -> String {
    format!("{} — {}", label_for_width(width), now.format("%H:%M"))
}

/// Keeps the title current: once a second, and 200 ms after the last of a
/// burst of resizes.
#[derive(Debug)]
pub struct TitleUpdater {
    tick: RepeatingTimer,
    resize: Debouncer<f32>,
}

impl Default for TitleUpdater {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleUpdater {
    pub fn new() -> Self {
        Self {
            tick: RepeatingTimer::new(TITLE_INTERVAL),
            resize: Debouncer::new(RESIZE_DEBOUNCE),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.tick.is_running()
    }

    pub fn attach(&mut self, now: Instant) {
        self.tick.start(now);
    }

    /// Stops the tick and drops any pending resize recompute.
    pub fn detach(&mut self) {
        self.tick.stop();
        self.resize.cancel();
    }

    /// Supersedes any pending recompute with one for `width`, due 200 ms
    /// after `now`.
    pub fn on_resize(&mut self, width: f32, now: Instant) {
        if !self.is_attached() {
            return;
        }
        let generation = self.resize.schedule(width, now);
        log::trace!("title recompute #{generation} scheduled for width {width}");
    }

    pub fn next_due(&self) -> Option<Instant> {
        earliest(self.tick.next_due(), self.resize.next_due())
    }

    /// Returns a new title when the tick or a debounced resize is due.
    ///
    /// `width` is the current client width, used by the 1 Hz tick; a resize
    /// recompute uses the width it was scheduled with.
    pub fn poll(&mut self, now: Instant, width: f32, time: NaiveTime) -> Option<String> {
        let resized = self.resize.poll(now);
        let ticked = self.tick.poll(now);

        match (resized, ticked) {
            (Some(w), _) => Some(title_for(w, time)),
            (None, true) => Some(title_for(width, time)),
            (None, false) => None,
        }
    }
}
