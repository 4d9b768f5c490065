//! Double-click synthesis from raw mouse presses.

use std::time::{Duration, Instant};

/// Two presses within this window count as a double-click.
const DOUBLE_CLICK_THRESHOLD: Duration = Duration::from_millis(400);

/// Synthesizes double-clicks from raw mouse presses.
///
/// The windowing layer only reports individual button presses, so the
/// browser-style `dblclick` gesture is reconstructed here: a press
/// landing within [`DOUBLE_CLICK_THRESHOLD`] of the previous one is a
/// double-click. The pair then resets, so a third rapid press starts a
/// fresh cycle rather than chaining.
pub struct ClickTracker {
    last_press: Option<Instant>,
}

impl ClickTracker {
    /// Create a tracker with no press history.
    #[must_use]
    pub fn new() -> Self {
        Self { last_press: None }
    }

    /// Record a press at the current time. Returns `true` when it
    /// completes a double-click.
    pub fn handle_press(&mut self) -> bool {
        self.handle_press_at(Instant::now())
    }

    /// Record a press at an explicit timestamp (injectable for tests).
    pub fn handle_press_at(&mut self, now: Instant) -> bool {
        let is_double = self
            .last_press
            .is_some_and(|prev| now.duration_since(prev) < DOUBLE_CLICK_THRESHOLD);

        if is_double {
            self.last_press = None;
        } else {
            self.last_press = Some(now);
        }
        is_double
    }
}

impl Default for ClickTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rapid_second_press_is_a_double_click() {
        let mut tracker = ClickTracker::new();
        let t0 = Instant::now();
        assert!(!tracker.handle_press_at(t0));
        assert!(tracker.handle_press_at(t0 + Duration::from_millis(150)));
    }

    #[test]
    fn slow_second_press_is_not_a_double_click() {
        let mut tracker = ClickTracker::new();
        let t0 = Instant::now();
        assert!(!tracker.handle_press_at(t0));
        assert!(!tracker.handle_press_at(t0 + Duration::from_millis(600)));
    }

    #[test]
    fn triple_press_does_not_chain() {
        let mut tracker = ClickTracker::new();
        let t0 = Instant::now();
        let step = Duration::from_millis(100);
        assert!(!tracker.handle_press_at(t0));
        assert!(tracker.handle_press_at(t0 + step));
        // The pair was consumed: the third press starts over
        assert!(!tracker.handle_press_at(t0 + step * 2));
        assert!(tracker.handle_press_at(t0 + step * 3));
    }
}
