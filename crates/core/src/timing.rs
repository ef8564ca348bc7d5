//! Deterministic clocks for the page timers.
//!
//! The original pages leaned on `setTimeout`/`setInterval`; these variants
//! are driven by the host's clock so controllers stay synchronous and
//! testable. An async host can still wrap them in `tokio::time`.

use std::time::{Duration, Instant};

/// Trailing-edge debounce, as used by the product search box (300 ms).
///
/// Every keystroke re-arms the deadline; [`Debouncer::fire`] reports `true`
/// once the quiet period has elapsed and then disarms.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Re-arm the deadline from `now`.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Whether a trigger is waiting to fire.
    #[must_use]
    pub const fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Fire if the quiet period has elapsed; disarms on firing.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Self re-arming periodic timer, as used by the dashboard refresh (60 s).
#[derive(Debug)]
pub struct RefreshTimer {
    every: Duration,
    next: Instant,
}

impl RefreshTimer {
    #[must_use]
    pub fn new(every: Duration, now: Instant) -> Self {
        Self {
            every,
            next: now + every,
        }
    }

    /// The refresh period.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.every
    }

    /// Whether a refresh is due; re-arms from `now` when it fires.
    pub fn due(&mut self, now: Instant) -> bool {
        if now >= self.next {
            self.next = now + self.every;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_debouncer_fires_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(300 * MS);

        debouncer.trigger(start);
        assert!(!debouncer.fire(start + 100 * MS));
        assert!(debouncer.fire(start + 300 * MS));
        // Disarmed after firing.
        assert!(!debouncer.fire(start + 400 * MS));
    }

    #[test]
    fn test_debouncer_keystrokes_push_deadline_back() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(300 * MS);

        debouncer.trigger(start);
        debouncer.trigger(start + 200 * MS);
        // 300ms after the first keystroke but only 100ms after the second.
        assert!(!debouncer.fire(start + 300 * MS));
        assert!(debouncer.fire(start + 500 * MS));
    }

    #[test]
    fn test_debouncer_idle_until_triggered() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(300 * MS);
        assert!(!debouncer.pending());
        assert!(!debouncer.fire(start + 1000 * MS));
    }

    #[test]
    fn test_refresh_timer_rearms() {
        let start = Instant::now();
        let mut timer = RefreshTimer::new(60_000 * MS, start);

        assert!(!timer.due(start + 59_999 * MS));
        assert!(timer.due(start + 60_000 * MS));
        // Re-armed relative to the firing instant.
        assert!(!timer.due(start + 60_001 * MS));
        assert!(timer.due(start + 120_000 * MS));
    }
}
