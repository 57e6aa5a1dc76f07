//! Repaint cadence for the second hand.

use std::time::{Duration, Instant};

use astar_engine::time::RepeatingTimer;

pub const SNAPPED_INTERVAL: Duration = Duration::from_millis(1000);
pub const SMOOTH_INTERVAL: Duration = Duration::from_millis(16);

#[inline]
fn interval_for(smooth: bool) -> Duration {
    if smooth { SMOOTH_INTERVAL } else { SNAPPED_INTERVAL }
}

/// Requests a repaint every second, or every frame while the second hand
/// sweeps smoothly. Runs only while attached to a visible window.
#[derive(Debug)]
pub struct RedrawScheduler {
    timer: RepeatingTimer,
    smooth: bool,
}

impl RedrawScheduler {
    pub fn new(smooth: bool) -> Self {
        Self {
            timer: RepeatingTimer::new(interval_for(smooth)),
            smooth,
        }
    }

    pub fn interval(&self) -> Duration {
        self.timer.interval()
    }

    pub fn is_attached(&self) -> bool {
        self.timer.is_running()
    }

    pub fn attach(&mut self, now: Instant) {
        log::debug!("redraw scheduler attached ({:?})", self.timer.interval());
        self.timer.start(now);
    }

    pub fn detach(&mut self) {
        log::debug!("redraw scheduler detached");
        self.timer.stop();
    }

    /// Switches cadence immediately; a running timer next fires one new
    /// interval after `now`.
    pub fn set_smooth_seconds(&mut self, smooth: bool, now: Instant) {
        if self.smooth == smooth {
            return;
        }
        self.smooth = smooth;
        let interval = interval_for(smooth);
        log::debug!("redraw interval -> {interval:?}");
        self.timer.set_interval(interval, now);
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.timer.next_due()
    }

    /// `true` when a repaint is due.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.timer.poll(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn interval_follows_smoothness() {
        assert_eq!(RedrawScheduler::new(true).interval(), ms(16));
        assert_eq!(RedrawScheduler::new(false).interval(), ms(1000));
    }

    #[test]
    fn detached_scheduler_never_fires() {
        let t0 = Instant::now();
        let mut s = RedrawScheduler::new(false);
        assert!(!s.poll(t0 + ms(5000)));
        assert_eq!(s.next_due(), None);

        s.attach(t0);
        s.detach();
        assert!(!s.poll(t0 + ms(5000)));
    }

    #[test]
    fn attached_scheduler_ticks_each_second() {
        let t0 = Instant::now();
        let mut s = RedrawScheduler::new(false);
        s.attach(t0);
        assert!(!s.poll(t0 + ms(999)));
        assert!(s.poll(t0 + ms(1000)));
        assert!(!s.poll(t0 + ms(1500)));
        assert!(s.poll(t0 + ms(2000)));
    }

    #[test]
    fn switching_to_smooth_reschedules_from_now() {
        let t0 = Instant::now();
        let mut s = RedrawScheduler::new(false);
        s.attach(t0);
        s.set_smooth_seconds(true, t0 + ms(100));
        assert_eq!(s.interval(), ms(16));
        assert_eq!(s.next_due(), Some(t0 + ms(116)));
        assert!(s.poll(t0 + ms(116)));
    }

    #[test]
    fn switching_while_detached_stays_detached() {
        let t0 = Instant::now();
        let mut s = RedrawScheduler::new(true);
        s.set_smooth_seconds(false, t0);
        assert_eq!(s.interval(), ms(1000));
        assert!(!s.is_attached());
        assert_eq!(s.next_due(), None);
    }
}
