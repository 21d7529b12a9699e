//! Deferred one-shot tasks driven by the winit event loop.
//!
//! The first navigation is not issued when the window appears but a fixed
//! delay later. Rather than a hidden sleep or an engine timer, the delay is
//! modelled as a [`DeferredTask`] that the event loop polls from
//! `about_to_wait()` and uses to program `ControlFlow::WaitUntil`.

use std::time::{Duration, Instant};

/// Delay between window construction and the first navigation.
///
/// Lets the host window settle before the engine starts loading. The value
/// has no observable derivation; keep it unless measurements say otherwise.
pub const STARTUP_NAVIGATION_DELAY: Duration = Duration::from_millis(1000);

/// A payload released exactly once, no earlier than its deadline.
///
/// There is no cancel: once scheduled, the task fires on the first poll at or
/// after its deadline.
#[derive(Debug)]
pub struct DeferredTask<T> {
    deadline: Instant,
    payload: Option<T>,
}

impl<T> DeferredTask<T> {
    /// Schedules `payload` to fire `delay` after `now`.
    pub fn schedule(payload: T, delay: Duration, now: Instant) -> Self {
        Self {
            deadline: now + delay,
            payload: Some(payload),
        }
    }

    /// Instant at which the task becomes due.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// `true` until the payload has been taken.
    pub fn is_pending(&self) -> bool {
        self.payload.is_some()
    }

    /// Releases the payload if `now` has reached the deadline.
    ///
    /// Returns `None` before the deadline and on every call after the first
    /// successful one.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if now >= self.deadline {
            self.payload.take()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_delay_is_one_second() {
        assert_eq!(STARTUP_NAVIGATION_DELAY, Duration::from_millis(1000));
    }

    #[test]
    fn test_not_due_before_deadline() {
        let start = Instant::now();
        let mut task = DeferredTask::schedule("go", Duration::from_millis(1000), start);
        assert_eq!(task.poll(start), None);
        assert_eq!(task.poll(start + Duration::from_millis(999)), None);
        assert!(task.is_pending());
    }

    #[test]
    fn test_fires_once_at_deadline() {
        let start = Instant::now();
        let mut task = DeferredTask::schedule("go", Duration::from_millis(1000), start);
        assert_eq!(task.deadline(), start + Duration::from_millis(1000));
        assert_eq!(task.poll(start + Duration::from_millis(1000)), Some("go"));
        assert!(!task.is_pending());
        assert_eq!(task.poll(start + Duration::from_secs(5)), None);
    }

    #[test]
    fn test_late_poll_still_fires() {
        let start = Instant::now();
        let mut task = DeferredTask::schedule(7, Duration::from_millis(10), start);
        assert_eq!(task.poll(start + Duration::from_secs(60)), Some(7));
    }

    #[test]
    fn test_zero_delay_fires_immediately() {
        let start = Instant::now();
        let mut task = DeferredTask::schedule((), Duration::ZERO, start);
        assert_eq!(task.poll(start), Some(()));
    }
}
