//! Debounce timer for criteria-triggered timeline queries.

use std::time::{Duration, Instant};

/// A single cancellable deadline with a payload. Arming replaces any pending
/// deadline, so at most one fire is outstanding and only the most recent
/// payload within the window is ever delivered. Time is passed in by the
/// caller, which keeps the event loop in charge of the clock and lets tests
/// run without sleeping.
pub struct Debounce {
    interval: Duration,
    pending: Option<(Instant, String)>,
}

impl Debounce {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    /// (Re)arm the timer: any previously pending fire is replaced.
    pub fn arm(&mut self, payload: String, now: Instant) {
        self.pending = Some((now + self.interval, payload));
    }

    /// Fire if the deadline has passed. Returns the payload at most once per arm.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => {
                self.pending.take().map(|(_, payload)| payload)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    #[test]
    fn does_not_fire_before_deadline() {
        let start = Instant::now();
        let mut debounce = Debounce::new(WINDOW);
        debounce.arm("x".to_string(), start);
        assert_eq!(debounce.poll(start + Duration::from_millis(100)), None);
        assert!(debounce.is_armed());
    }

    #[test]
    fn fires_once_after_deadline() {
        let start = Instant::now();
        let mut debounce = Debounce::new(WINDOW);
        debounce.arm("x".to_string(), start);
        assert_eq!(debounce.poll(start + WINDOW), Some("x".to_string()));
        assert_eq!(debounce.poll(start + WINDOW * 2), None);
        assert!(!debounce.is_armed());
    }

    #[test]
    fn rearm_replaces_pending_payload() {
        let start = Instant::now();
        let mut debounce = Debounce::new(WINDOW);
        debounce.arm("x".to_string(), start);
        debounce.arm("xy".to_string(), start + Duration::from_millis(100));
        // The first deadline passing alone is not enough; only the re-armed
        // deadline counts, and it carries the latest value.
        assert_eq!(debounce.poll(start + WINDOW), None);
        assert_eq!(
            debounce.poll(start + Duration::from_millis(100) + WINDOW),
            Some("xy".to_string())
        );
    }

    #[test]
    fn cancel_clears_pending() {
        let start = Instant::now();
        let mut debounce = Debounce::new(WINDOW);
        debounce.arm("x".to_string(), start);
        debounce.cancel();
        assert_eq!(debounce.poll(start + WINDOW), None);
    }
}
