//! Per-target frame pacing
//!
//! Each render target may carry a desired frame rate. A target is due when
//! its next update instant is at or before the query instant. Servicing a
//! target moves its next update past the query instant in whole frame
//! intervals, so a long stall costs one catch-up frame instead of a burst.
//!
//! ```text
//! spf = 0.1s
//! next: t0 ─┬──────────────────────────────── step(t0 + 10s)
//!           └─► one draw, next = t0 + 10.1s
//! ```

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use log::{trace, warn};

use crate::render::{RenderError, RenderResult, RenderTargetId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameTimer {
    seconds_per_frame: Duration,
    next_update: Instant,
}

impl FrameTimer {
    /// Move `next_update` strictly past `tp`
    ///
    /// Returns `false` when the next deadline is not representable as an
    /// `Instant`; the timer is left untouched in that case.
    fn advance_past(&mut self, tp: Instant) -> bool {
        let mut next = self.next_update;
        let behind = tp.saturating_duration_since(next).as_secs_f64();
        let frames = (behind / self.seconds_per_frame.as_secs_f64()).floor();
        if frames >= 1.0 {
            let Ok(skipped) = Duration::try_from_secs_f64(self.seconds_per_frame.as_secs_f64() * frames) else {
                return false;
            };
            let Some(caught_up) = next.checked_add(skipped) else {
                return false;
            };
            next = caught_up;
        }
        while next <= tp {
            let Some(following) = next.checked_add(self.seconds_per_frame) else {
                return false;
            };
            next = following;
        }
        self.next_update = next;
        true
    }
}

/// Frame timers for every paced render target
#[derive(Debug, Default)]
pub struct FrameScheduler {
    timers: BTreeMap<RenderTargetId, FrameTimer>,
    queue: Vec<RenderTargetId>,
}

impl FrameScheduler {
    /// Create a scheduler with no paced targets
    pub fn new() -> Self {
        Self::default()
    }

    /// Pace `target` at `fps`, first due at `now`
    ///
    /// Replaces any earlier rate for the same target.
    pub fn set_desired_fps(&mut self, target: RenderTargetId, fps: f32, now: Instant) -> RenderResult<()> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(RenderError::InvalidArgument(format!(
                "desired fps must be positive and finite, got {fps}"
            )));
        }
        let seconds_per_frame = Duration::try_from_secs_f64(1.0 / f64::from(fps))
            .map_err(|err| RenderError::InvalidArgument(format!("desired fps {fps} is too low: {err}")))?;
        if seconds_per_frame.is_zero() {
            return Err(RenderError::InvalidArgument(format!("desired fps {fps} is too high")));
        }
        if now.checked_add(seconds_per_frame).is_none() {
            return Err(RenderError::InvalidArgument(format!(
                "desired fps {fps} is too low to schedule a second frame"
            )));
        }

        trace!("Target {} paced at {} fps", target, fps);
        self.timers.insert(
            target,
            FrameTimer {
                seconds_per_frame,
                next_update: now,
            },
        );
        Ok(())
    }

    /// Stop pacing `target` and drop it from the pending queue
    pub fn remove(&mut self, target: RenderTargetId) -> bool {
        self.queue.retain(|&queued| queued != target);
        self.timers.remove(&target).is_some()
    }

    /// Whether `target` has a desired frame rate
    pub fn is_paced(&self, target: RenderTargetId) -> bool {
        self.timers.contains_key(&target)
    }

    /// Frame interval of `target`
    pub fn seconds_per_frame(&self, target: RenderTargetId) -> Option<Duration> {
        self.timers.get(&target).map(|timer| timer.seconds_per_frame)
    }

    /// Queue every target due at `tp` and advance its timer past `tp`
    ///
    /// A target is queued at most once, however far behind it was. Targets
    /// are queued by the instant they became due, ties broken by id. A timer
    /// whose next deadline cannot be represented is retired after this frame.
    pub fn step_target_times(&mut self, tp: Instant) {
        let mut due = Vec::new();
        let mut retired = Vec::new();
        for (&target, timer) in &mut self.timers {
            if timer.next_update > tp {
                continue;
            }
            due.push((timer.next_update, target));
            if !timer.advance_past(tp) {
                retired.push(target);
            }
        }

        due.sort_by_key(|&(became_due, _)| became_due);
        for (_, target) in due {
            if !self.queue.contains(&target) {
                self.queue.push(target);
            }
        }
        for target in retired {
            warn!("Target {} has no representable next frame; pacing stopped", target);
            self.timers.remove(&target);
        }
    }

    /// Take the queued targets in the order they became due
    pub fn drain_due(&mut self) -> Vec<RenderTargetId> {
        std::mem::take(&mut self.queue)
    }

    /// Earliest instant at which any target becomes due
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().map(|timer| timer.next_update).min()
    }

    /// Number of paced targets
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether no target is paced
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpaced_targets_are_never_due() {
        let mut scheduler = FrameScheduler::new();
        scheduler.step_target_times(Instant::now() + Duration::from_secs(60));
        assert!(scheduler.drain_due().is_empty());
    }

    #[test]
    fn test_due_immediately_after_setting_fps() {
        let t0 = Instant::now();
        let mut scheduler = FrameScheduler::new();
        scheduler.set_desired_fps(1, 10.0, t0).unwrap();

        scheduler.step_target_times(t0);
        assert_eq!(scheduler.drain_due(), vec![1]);
        assert_eq!(scheduler.next_deadline(), Some(t0 + Duration::from_millis(100)));
    }

    #[test]
    fn test_long_stall_collapses_to_one_frame() {
        let t0 = Instant::now();
        let mut scheduler = FrameScheduler::new();
        scheduler.set_desired_fps(1, 10.0, t0).unwrap();

        let late = t0 + Duration::from_secs(10);
        scheduler.step_target_times(late);
        assert_eq!(scheduler.drain_due(), vec![1]);

        let next = scheduler.next_deadline().unwrap();
        assert!(next > late);
        assert!(next <= late + Duration::from_millis(100));

        scheduler.step_target_times(late);
        assert!(scheduler.drain_due().is_empty());
    }

    #[test]
    fn test_rejects_non_positive_fps() {
        let mut scheduler = FrameScheduler::new();
        let now = Instant::now();

        for fps in [0.0, -5.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                scheduler.set_desired_fps(1, fps, now),
                Err(RenderError::InvalidArgument(_))
            ));
        }
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_remove_drops_timer_and_queue_entry() {
        let t0 = Instant::now();
        let mut scheduler = FrameScheduler::new();
        scheduler.set_desired_fps(1, 30.0, t0).unwrap();
        scheduler.set_desired_fps(2, 30.0, t0).unwrap();
        scheduler.step_target_times(t0);

        assert!(scheduler.remove(1));
        assert!(!scheduler.remove(1));
        assert_eq!(scheduler.drain_due(), vec![2]);
        assert!(!scheduler.is_paced(1));
    }

    #[test]
    fn test_rejects_fps_too_low_to_schedule() {
        let mut scheduler = FrameScheduler::new();
        let now = Instant::now();

        // 1e-20 overflows Duration; 6e-20 fits Duration but not Instant.
        for fps in [1e-20, 6e-20] {
            assert!(matches!(
                scheduler.set_desired_fps(1, fps, now),
                Err(RenderError::InvalidArgument(_))
            ));
        }
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_unrepresentable_deadline_retires_timer() {
        let t0 = Instant::now();
        let mut scheduler = FrameScheduler::new();
        scheduler.timers.insert(
            1,
            FrameTimer {
                seconds_per_frame: Duration::MAX,
                next_update: t0,
            },
        );
        scheduler.set_desired_fps(2, 10.0, t0).unwrap();

        scheduler.step_target_times(t0 + Duration::from_millis(1));
        assert_eq!(scheduler.drain_due(), vec![1, 2]);
        assert!(!scheduler.is_paced(1));
        assert!(scheduler.is_paced(2));
    }

    #[test]
    fn test_due_targets_queue_in_deadline_order() {
        let t0 = Instant::now();
        let mut scheduler = FrameScheduler::new();
        scheduler.set_desired_fps(1, 10.0, t0 + Duration::from_millis(20)).unwrap();
        scheduler.set_desired_fps(2, 10.0, t0).unwrap();
        scheduler.set_desired_fps(3, 10.0, t0 + Duration::from_millis(20)).unwrap();

        scheduler.step_target_times(t0 + Duration::from_millis(30));
        assert_eq!(scheduler.drain_due(), vec![2, 1, 3]);
    }

    #[test]
    fn test_repeated_steps_do_not_duplicate_queue_entries() {
        let t0 = Instant::now();
        let mut scheduler = FrameScheduler::new();
        scheduler.set_desired_fps(1, 1000.0, t0).unwrap();

        scheduler.step_target_times(t0);
        scheduler.step_target_times(t0 + Duration::from_millis(5));
        assert_eq!(scheduler.drain_due(), vec![1]);
    }
}
