//! Wall-clock sampling.

use chrono::{Local, NaiveTime};

/// Source of the current local wall-clock time.
///
/// The shell samples once per frame; tests substitute a fixed time.
pub trait TimeSource {
    fn now(&self) -> NaiveTime;
}

/// Reads the system clock in the local time zone.
#[derive(Debug, Default, Copy, Clone)]
pub struct LocalClock;

impl TimeSource for LocalClock {
    #[inline]
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Always reports the same time.
#[derive(Debug, Copy, Clone)]
pub struct FixedClock(pub NaiveTime);

impl TimeSource for FixedClock {
    #[inline]
    fn now(&self) -> NaiveTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_is_stable() {
        let t = NaiveTime::from_hms_milli_opt(10, 15, 30, 750).unwrap();
        let clock = FixedClock(t);
        assert_eq!(clock.now(), t);
        assert_eq!(clock.now(), clock.now());
    }
}
