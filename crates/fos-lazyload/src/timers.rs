//! Timer queue
//!
//! One-shot timeouts against a virtual clock. The owner advances the clock
//! and pops due timers one at a time, so a callback may schedule follow-up
//! timers that still fall inside the same advance.

use std::collections::HashMap;
use std::time::Duration;

use crate::host::TimerId;

/// Timeout queue with a virtual clock
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    /// Deadline of each pending timer
    timers: HashMap<TimerId, Duration>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Add a timeout
    pub fn set_timeout(&mut self, delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.insert(id, self.now + delay);
        id
    }

    /// Clear a timer
    pub fn clear(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    /// Remove the earliest timer due at or before `until`
    ///
    /// The clock moves to that timer's deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerId> {
        let (&id, &deadline) = self
            .timers
            .iter()
            .filter(|&(_, &deadline)| deadline <= until)
            .min_by_key(|&(&id, &deadline)| (deadline, id))?;

        self.timers.remove(&id);
        self.now = self.now.max(deadline);
        Some(id)
    }

    /// Move the clock forward to `until` once nothing else is due
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Check if there are pending timers
    pub fn has_pending(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Number of pending timers
    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_queue() {
        let mut queue = TimerQueue::new();

        let id1 = queue.set_timeout(Duration::from_millis(100));
        let id2 = queue.set_timeout(Duration::from_millis(200));
        assert!(queue.has_pending());

        assert!(queue.clear(id1));
        assert!(!queue.clear(id1));
        assert_eq!(queue.pending_count(), 1);

        assert!(queue.clear(id2));
        assert!(!queue.has_pending());
    }

    #[test]
    fn test_pop_due_in_deadline_order() {
        let mut queue = TimerQueue::new();
        let late = queue.set_timeout(Duration::from_millis(300));
        let early = queue.set_timeout(Duration::from_millis(100));

        let until = Duration::from_millis(250);
        assert_eq!(queue.pop_due(until), Some(early));
        assert_eq!(queue.now(), Duration::from_millis(100));
        assert_eq!(queue.pop_due(until), None);

        queue.settle(until);
        assert_eq!(queue.now(), until);
        assert_eq!(queue.pop_due(Duration::from_millis(299)), None);
        assert_eq!(queue.pop_due(Duration::from_millis(300)), Some(late));
    }

    #[test]
    fn test_rescheduled_timer_fires_within_same_window() {
        let mut queue = TimerQueue::new();
        queue.set_timeout(Duration::from_millis(500));

        let until = Duration::from_millis(1200);
        let mut fired = 0;
        while queue.pop_due(until).is_some() {
            fired += 1;
            queue.set_timeout(Duration::from_millis(500));
        }
        queue.settle(until);

        assert_eq!(fired, 2);
        assert_eq!(queue.pending_count(), 1);
        assert_eq!(queue.pop_due(Duration::from_millis(1499)), None);
        assert!(queue.pop_due(Duration::from_millis(1500)).is_some());
    }
}
