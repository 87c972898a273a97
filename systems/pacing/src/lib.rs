#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Input pacing that keeps at most one move animating at a time.
//!
//! Admission is leading-edge: the first request opens a throttle window and
//! every request that arrives before the window closes is dropped rather than
//! queued. An admitted move that changed the board additionally schedules a
//! settle step once the merge animation finishes; admission stays closed while
//! that settle is pending.

use std::time::Duration;

use tracing::trace;

/// Configuration parameters required to construct the pacing system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    throttle_window: Duration,
    settle_delay: Duration,
}

impl Config {
    /// Creates a new configuration from the throttle window and settle delay.
    #[must_use]
    pub const fn new(throttle_window: Duration, settle_delay: Duration) -> Self {
        Self {
            throttle_window,
            settle_delay,
        }
    }
}

/// Settle step scheduled by [`Pacing::schedule_settle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingSettle {
    /// Simulation time at which the settle becomes due.
    pub due: Duration,
}

/// Scheduler holding the last admission time and the pending settle timer.
#[derive(Clone, Debug)]
pub struct Pacing {
    config: Config,
    last_admitted: Option<Duration>,
    pending: Option<PendingSettle>,
}

impl Pacing {
    /// Creates a new pacing system with no admission history.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            config,
            last_admitted: None,
            pending: None,
        }
    }

    /// Admits a move requested at `now` unless the throttle window is still
    /// open or a settle is pending. An admitted request opens a new window.
    pub fn try_admit(&mut self, now: Duration) -> bool {
        if let Some(pending) = self.pending {
            trace!(?now, due = ?pending.due, "move dropped while settle is pending");
            return false;
        }

        if let Some(last) = self.last_admitted {
            if now.saturating_sub(last) < self.config.throttle_window {
                trace!(?now, ?last, "move dropped inside throttle window");
                return false;
            }
        }

        self.last_admitted = Some(now);
        true
    }

    /// Schedules the settle step for a move admitted at `now`.
    pub fn schedule_settle(&mut self, now: Duration) -> PendingSettle {
        let pending = PendingSettle {
            due: now.saturating_add(self.config.settle_delay),
        };
        self.pending = Some(pending);
        pending
    }

    /// Invalidates the pending settle step, if any.
    pub fn cancel_pending(&mut self) -> Option<PendingSettle> {
        self.pending.take()
    }

    /// Removes and returns the pending settle once `now` reaches its due time.
    pub fn take_due(&mut self, now: Duration) -> Option<PendingSettle> {
        match self.pending {
            Some(pending) if now >= pending.due => self.pending.take(),
            _ => None,
        }
    }

    /// Settle step currently waiting for its due time.
    #[must_use]
    pub const fn pending(&self) -> Option<PendingSettle> {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pacing() -> Pacing {
        Pacing::new(Config::new(
            Duration::from_millis(105),
            Duration::from_millis(100),
        ))
    }

    #[test]
    fn first_request_is_admitted() {
        let mut pacing = pacing();
        assert!(pacing.try_admit(Duration::ZERO));
        assert!(pacing.pending().is_none());
    }

    #[test]
    fn window_is_measured_from_last_admission() {
        let mut pacing = pacing();
        assert!(pacing.try_admit(Duration::from_millis(10)));
        assert!(!pacing.try_admit(Duration::from_millis(60)));
        assert!(!pacing.try_admit(Duration::from_millis(114)));
        assert!(pacing.try_admit(Duration::from_millis(115)));
    }
}
