//! Change poller state
//!
//! Keeps at most one pending poll timer and the snapshot taken at the
//! previous poll. The poll itself lives on `LazyLoader`, which owns the
//! state this compares against.

use std::time::Duration;

use crate::discovery::Snapshot;
use crate::host::{Scheduler, TimerId};

#[derive(Debug)]
pub struct ChangePoller {
    interval: Duration,
    pending: Option<TimerId>,
    last: Option<Snapshot>,
}

impl ChangePoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
            last: None,
        }
    }

    /// A poll is scheduled
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Schedule the next poll, replacing any pending one
    pub fn schedule<S: Scheduler>(&mut self, host: &mut S) {
        self.cancel(host);
        self.pending = Some(host.set_timeout(self.interval));
    }

    /// Cancel the pending poll, if any
    pub fn cancel<S: Scheduler>(&mut self, host: &mut S) -> bool {
        match self.pending.take() {
            Some(id) => {
                host.clear_timeout(id);
                true
            }
            None => false,
        }
    }

    /// Claim an expired timer; false for anything but the pending poll
    pub fn take_expired(&mut self, id: TimerId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Record a snapshot, reporting whether it differs from the last one
    pub fn observe(&mut self, snapshot: Snapshot) -> bool {
        let changed = self.last.as_ref() != Some(&snapshot);
        self.last = Some(snapshot);
        changed
    }

    /// Record a snapshot without comparing
    pub fn remember(&mut self, snapshot: Snapshot) {
        self.last = Some(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timers::TimerQueue;

    struct Clock(TimerQueue);

    impl Scheduler for Clock {
        fn set_timeout(&mut self, delay: Duration) -> TimerId {
            self.0.set_timeout(delay)
        }

        fn clear_timeout(&mut self, id: TimerId) {
            self.0.clear(id);
        }
    }

    #[test]
    fn test_single_pending_timer() {
        let mut clock = Clock(TimerQueue::new());
        let mut poller = ChangePoller::new(Duration::from_millis(500));

        poller.schedule(&mut clock);
        poller.schedule(&mut clock);
        assert_eq!(clock.0.pending_count(), 1);
        assert!(poller.is_running());

        assert!(poller.cancel(&mut clock));
        assert!(!poller.cancel(&mut clock));
        assert!(!clock.0.has_pending());
    }

    #[test]
    fn test_take_expired_ignores_stale_ids() {
        let mut clock = Clock(TimerQueue::new());
        let mut poller = ChangePoller::new(Duration::from_millis(500));

        poller.schedule(&mut clock);
        let stale = clock.0.pop_due(Duration::from_millis(500)).unwrap();
        poller.schedule(&mut clock);

        assert!(!poller.take_expired(stale));
        assert!(poller.is_running());
    }

    #[test]
    fn test_observe_detects_change() {
        let mut poller = ChangePoller::new(Duration::from_millis(500));

        assert!(poller.observe(Snapshot::default()));
        assert!(!poller.observe(Snapshot::default()));

        poller.remember(Snapshot::default());
        assert!(!poller.observe(Snapshot::default()));
    }
}
