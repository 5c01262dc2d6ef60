//! Host-driven scheduling primitives.
//!
//! Nothing in here owns a clock. Hosts pass monotonic millisecond timestamps
//! (the same values an animation frame or timer callback would receive) and
//! the primitives report what became due.

use serde::{Deserialize, Serialize};

/// Millisecond timestamp supplied by the host.
pub type Millis = u64;

/// Identifies a scheduled task so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct PendingTimer<T> {
    handle: TimerHandle,
    due: Millis,
    payload: T,
}

/// Queue of cancellable delayed tasks.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    next_id: u64,
    pending: Vec<PendingTimer<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Millis, delay: Millis, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingTimer {
            handle,
            due: now.saturating_add(delay),
            payload,
        });
        handle
    }

    /// Drops a pending task. Returns `false` if it already ran or never existed.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.handle != handle);
        self.pending.len() != before
    }

    /// Removes and returns every task due at `now`, earliest first. Tasks due
    /// at the same instant keep their scheduling order.
    pub fn drain_due(&mut self, now: Millis) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|timer| timer.due <= now);
        self.pending = pending;
        due.sort_by_key(|timer| (timer.due, timer.handle));
        due.into_iter().map(|timer| timer.payload).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest pending deadline, useful for hosts arming a single real timer.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.pending.iter().map(|timer| timer.due).min()
    }
}

/// Trailing-edge debounce: only the last trigger of a burst fires, once the
/// quiet period has elapsed.
#[derive(Debug, Clone)]
pub struct Debouncer {
    wait: Millis,
    deadline: Option<Millis>,
}

impl Debouncer {
    pub fn new(wait: Millis) -> Self {
        Self {
            wait,
            deadline: None,
        }
    }

    /// Cancels any pending deadline and starts a fresh quiet period.
    pub fn trigger(&mut self, now: Millis) {
        self.deadline = Some(now.saturating_add(self.wait));
    }

    /// Returns `true` exactly once per burst, when the quiet period is over.
    pub fn poll(&mut self, now: Millis) -> bool {
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

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Millis> {
        self.deadline
    }
}

/// Coalesces values requested between two animation frames, keeping the
/// most recent one.
#[derive(Debug, Clone)]
pub struct FrameThrottle<T> {
    pending: Option<T>,
}

impl<T> Default for FrameThrottle<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> FrameThrottle<T> {
    pub fn request(&mut self, value: T) {
        self.pending = Some(value);
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_due_order_and_keeps_future_tasks() {
        let mut queue = TimerQueue::new();
        queue.schedule(0, 300, "late");
        queue.schedule(0, 100, "early");
        queue.schedule(0, 100, "early-second");

        assert_eq!(queue.drain_due(50), Vec::<&str>::new());
        assert_eq!(queue.drain_due(150), vec!["early", "early-second"]);
        assert_eq!(queue.next_deadline(), Some(300));
        assert_eq!(queue.drain_due(300), vec!["late"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule(10, 0, 1);
        assert!(queue.cancel(handle));
        assert!(!queue.cancel(handle));
        assert!(queue.drain_due(1_000).is_empty());
    }

    #[test]
    fn debounce_fires_once_after_last_trigger() {
        let mut debounce = Debouncer::new(120);
        debounce.trigger(0);
        debounce.trigger(100);
        debounce.trigger(200);

        assert!(!debounce.poll(300));
        assert!(debounce.poll(320));
        assert!(!debounce.poll(1_000));
    }

    #[test]
    fn frame_throttle_keeps_latest_value() {
        let mut throttle = FrameThrottle::default();
        throttle.request(1.0);
        throttle.request(2.0);
        assert_eq!(throttle.take(), Some(2.0));
        assert_eq!(throttle.take(), None);
    }
}
