use std::time::{Duration, Instant};

/// Smallest interval a timer accepts; zero would spin the event loop.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Repeating deadline timer.
///
/// A stopped timer has no deadline and never fires. When the loop falls behind
/// by more than one interval the missed ticks are coalesced into one.
#[derive(Debug, Clone)]
pub struct RepeatingTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl RepeatingTimer {
    /// Creates a stopped timer.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Starts the timer; the first tick is one interval after `now`.
    ///
    /// Starting a running timer keeps its current deadline.
    pub fn start(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.interval);
        }
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// Changes the interval. A running timer is rescheduled from `now` so the
    /// new cadence takes effect on the very next tick.
    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        self.interval = interval.max(MIN_INTERVAL);
        if self.next_due.is_some() {
            self.next_due = Some(now + self.interval);
        }
    }

    /// Returns `true` if the timer was due at `now`, advancing its deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else { return false };
        if now < due {
            return false;
        }

        let mut next = due + self.interval;
        if next <= now {
            next = now + self.interval;
        }
        self.next_due = Some(next);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn new_timer_is_stopped() {
        let mut t = RepeatingTimer::new(ms(100));
        let t0 = Instant::now();
        assert!(!t.is_running());
        assert!(t.next_due().is_none());
        assert!(!t.poll(t0 + ms(1_000)));
    }

    #[test]
    fn fires_once_per_interval() {
        let t0 = Instant::now();
        let mut t = RepeatingTimer::new(ms(100));
        t.start(t0);
        assert!(!t.poll(t0 + ms(99)));
        assert!(t.poll(t0 + ms(100)));
        assert!(!t.poll(t0 + ms(150)));
        assert!(t.poll(t0 + ms(200)));
        assert_eq!(t.next_due(), Some(t0 + ms(300)));
    }

    #[test]
    fn late_poll_coalesces_missed_ticks() {
        let t0 = Instant::now();
        let mut t = RepeatingTimer::new(ms(100));
        t.start(t0);
        assert!(t.poll(t0 + ms(550)));
        assert_eq!(t.next_due(), Some(t0 + ms(650)));
        assert!(!t.poll(t0 + ms(600)));
    }

    #[test]
    fn restart_keeps_existing_deadline() {
        let t0 = Instant::now();
        let mut t = RepeatingTimer::new(ms(100));
        t.start(t0);
        t.start(t0 + ms(50));
        assert_eq!(t.next_due(), Some(t0 + ms(100)));
    }

    #[test]
    fn stop_clears_deadline() {
        let t0 = Instant::now();
        let mut t = RepeatingTimer::new(ms(100));
        t.start(t0);
        t.stop();
        assert!(!t.poll(t0 + ms(500)));
    }

    #[test]
    fn set_interval_reschedules_running_timer_from_now() {
        let t0 = Instant::now();
        let mut t = RepeatingTimer::new(ms(1_000));
        t.start(t0);
        t.set_interval(ms(16), t0 + ms(400));
        assert_eq!(t.next_due(), Some(t0 + ms(416)));
        assert!(t.poll(t0 + ms(416)));
    }

    #[test]
    fn set_interval_on_stopped_timer_does_not_start_it() {
        let t0 = Instant::now();
        let mut t = RepeatingTimer::new(ms(1_000));
        t.set_interval(ms(16), t0);
        assert!(!t.is_running());
        assert_eq!(t.interval(), ms(16));
    }

    #[test]
    fn zero_interval_is_clamped() {
        assert_eq!(RepeatingTimer::new(Duration::ZERO).interval(), MIN_INTERVAL);
    }
}
