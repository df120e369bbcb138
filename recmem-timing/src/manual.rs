use std::cell::Cell;
use std::time::Duration;

use crate::timer::Timer;

/// A deterministic clock for replaying sessions and driving tests.
///
/// Every `now` reading advances the clock by `tick`, so a loop that polls the
/// clock always makes progress. `sleep` advances it by the requested amount
/// without blocking.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<Duration>,
    tick: Duration,
    slept: Cell<Duration>,
}

impl ManualClock {
    pub fn new(tick: Duration) -> Self {
        Self {
            now: Cell::new(Duration::ZERO),
            tick,
            slept: Cell::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, d: Duration) {
        self.now.set(self.now.get() + d);
    }

    /// Total time spent in `sleep` since creation.
    pub fn total_slept(&self) -> Duration {
        self.slept.get()
    }
}

impl Timer for ManualClock {
    fn reset(&mut self) {
        self.now.set(Duration::ZERO);
    }

    fn now(&self) -> Duration {
        let t = self.now.get();
        self.now.set(t + self.tick);
        t
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
        self.slept.set(self.slept.get() + d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readings_advance_by_tick() {
        let clock = ManualClock::new(Duration::from_millis(10));
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(clock.now(), Duration::from_millis(10));
    }

    #[test]
    fn sleep_is_tracked_and_reset_does_not_clear_it() {
        let mut clock = ManualClock::new(Duration::ZERO);
        clock.sleep(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(1));
        clock.reset();
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(clock.total_slept(), Duration::from_secs(1));
    }
}
