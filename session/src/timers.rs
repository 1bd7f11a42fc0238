//! Wall-clock timers owned by the session phases that need them.
//!
//! A timer lives inside its phase value, so replacing the phase releases it
//! whichever way the phase is left.

use std::time::{Duration, Instant};

/// One-shot deadline armed when loading reaches completion.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SettleTimer {
    deadline: Instant,
}

impl SettleTimer {
    pub(crate) fn start(now: Instant, delay: Duration) -> Self {
        Self {
            deadline: now + delay,
        }
    }

    pub(crate) fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

/// Repeating sampler firing at most once per wall-clock pulse.
#[derive(Clone, Copy, Debug)]
pub(crate) struct IntervalSampler {
    interval: Duration,
    next_due: Instant,
}

impl IntervalSampler {
    pub(crate) fn start(now: Instant, interval: Duration) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    /// Reports whether a sample is due at `now` and schedules the next one.
    ///
    /// Missed intervals collapse into a single sample.
    pub(crate) fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due += self.interval;
        if self.next_due <= now {
            self.next_due = now + self.interval;
        }
        true
    }
}
