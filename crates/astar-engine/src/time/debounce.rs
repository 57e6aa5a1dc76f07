use std::time::{Duration, Instant};

#[derive(Debug)]
struct Scheduled<T> {
    generation: u64,
    due: Instant,
    payload: T,
}

/// Trailing-edge debouncer built on a generation counter.
///
/// Every [`schedule`](Self::schedule) bumps the generation and enqueues a task
/// tagged with it. When a task comes due it only fires if its tag still equals
/// the current generation; superseded tasks are dropped silently. At most one
/// task can therefore ever fire per burst, and a stale task can never land
/// after a newer one.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    generation: u64,
    queue: Vec<Scheduled<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            queue: Vec::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Current generation. Only tasks tagged with this value may fire.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Supersedes any outstanding task and schedules `payload` for `now + delay`.
    ///
    /// Returns the generation the new task was tagged with.
    pub fn schedule(&mut self, payload: T, now: Instant) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.queue.push(Scheduled {
            generation: self.generation,
            due: now + self.delay,
            payload,
        });
        self.generation
    }

    /// Supersedes every outstanding task without scheduling a new one.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Deadline of the live task, if any. Superseded tasks never wake the loop.
    pub fn next_due(&self) -> Option<Instant> {
        self.queue
            .iter()
            .filter(|t| t.generation == self.generation)
            .map(|t| t.due)
            .min()
    }

    /// Runs every task due at `now`; returns the payload of the live one if it fired.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let mut fired = None;
        let mut i = 0;
        while i < self.queue.len() {
            if self.queue[i].due > now {
                i += 1;
                continue;
            }
            let task = self.queue.swap_remove(i);
            if task.generation == self.generation {
                fired = Some(task.payload);
            } else {
                log::trace!(
                    "debounce task gen {} superseded by gen {}; dropped",
                    task.generation,
                    self.generation
                );
            }
        }

        // Superseded tasks that are not due yet can never fire; drop them too.
        let current = self.generation;
        self.queue.retain(|t| t.generation == current);

        fired
    }
}
