// debounce.rs — Coalesce bursts of search keystrokes into one query run.
//
// The clock is passed in rather than read, so the controller and the tests
// decide what "now" is.

use std::time::{Duration, Instant};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay:    Duration,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, deadline: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)arm. A pending deadline is replaced, never kept.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once, on the first call at or after the deadline.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rapid_keystrokes_fire_once_after_the_last() {
        let t0 = Instant::now();
        let ms = Duration::from_millis;
        let mut d = Debouncer::default();

        d.schedule(t0);
        d.schedule(t0 + ms(100));
        d.schedule(t0 + ms(200));

        assert!(!d.fire_if_due(t0 + ms(300)));
        assert!(!d.fire_if_due(t0 + ms(499)));
        assert!(d.fire_if_due(t0 + ms(500)));
        assert!(!d.fire_if_due(t0 + ms(900)));
        assert!(!d.is_pending());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(50));
        d.schedule(t0);
        d.cancel();
        assert!(!d.fire_if_due(t0 + Duration::from_secs(1)));
    }
}
