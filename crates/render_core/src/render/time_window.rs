//! Logical tick window
//!
//! The caller advances simulation in ticks and tells the renderer the
//! instants of the previous and the current tick. Frames presented between
//! those instants draw objects part of the way from their previous to their
//! current sample.

use std::time::Instant;

/// The `[prev, now]` instants of the latest logical tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    prev: Instant,
    now: Instant,
}

impl TimeWindow {
    /// A zero-length window at `instant`
    pub fn new(instant: Instant) -> Self {
        Self {
            prev: instant,
            now: instant,
        }
    }

    /// Start of the window
    pub fn prev(&self) -> Instant {
        self.prev
    }

    /// End of the window
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Where `tp` falls inside the window, clamped to `[0, 1]`
    ///
    /// A zero-length or inverted window reports 1: the latest sample is the
    /// only one that can be shown.
    pub fn relative(&self, tp: Instant) -> f32 {
        let length = signed_seconds(self.now, self.prev);
        if length <= 0.0 {
            return 1.0;
        }
        #[allow(clippy::cast_possible_truncation)]
        let relative = (signed_seconds(tp, self.prev) / length) as f32;
        relative.clamp(0.0, 1.0)
    }

    /// Replace the window and return the tick blend factor
    ///
    /// The factor is how far the new window's start lies inside the old
    /// window, which is how much of the old "now" the previous samples must
    /// absorb.
    pub fn advance(&mut self, new_prev: Instant, new_now: Instant) -> f32 {
        let factor = self.relative(new_prev);
        self.prev = new_prev;
        self.now = new_now;
        factor
    }
}

/// `a - b` in seconds, negative when `a` precedes `b`
fn signed_seconds(a: Instant, b: Instant) -> f64 {
    match a.checked_duration_since(b) {
        Some(forward) => forward.as_secs_f64(),
        None => -b.duration_since(a).as_secs_f64(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::time::Duration;

    fn ms(base: Instant, millis: u64) -> Instant {
        base + Duration::from_millis(millis)
    }

    #[test]
    fn test_relative_inside_window() {
        let base = Instant::now();
        let window = TimeWindow {
            prev: ms(base, 100),
            now: ms(base, 200),
        };

        assert_relative_eq!(window.relative(ms(base, 100)), 0.0);
        assert_relative_eq!(window.relative(ms(base, 125)), 0.25, epsilon = 1e-5);
        assert_relative_eq!(window.relative(ms(base, 200)), 1.0);
    }

    #[test]
    fn test_relative_is_clamped() {
        let base = Instant::now();
        let window = TimeWindow {
            prev: ms(base, 100),
            now: ms(base, 200),
        };

        assert_relative_eq!(window.relative(base), 0.0);
        assert_relative_eq!(window.relative(ms(base, 10_000)), 1.0);
    }

    #[test]
    fn test_zero_length_window_reports_one() {
        let base = Instant::now();
        let window = TimeWindow::new(base);
        assert_relative_eq!(window.relative(base), 1.0);
        assert_relative_eq!(window.relative(ms(base, 5)), 1.0);
    }

    #[test]
    fn test_advance_returns_position_of_new_start() {
        let base = Instant::now();
        let mut window = TimeWindow {
            prev: base,
            now: ms(base, 100),
        };

        let factor = window.advance(ms(base, 50), ms(base, 150));
        assert_relative_eq!(factor, 0.5, epsilon = 1e-5);
        assert_eq!(window.prev(), ms(base, 50));
        assert_eq!(window.now(), ms(base, 150));
    }
}
