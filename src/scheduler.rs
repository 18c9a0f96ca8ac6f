use std::time::{Duration, Instant};

/// Cancellable repeating timer that drives game ticks.
///
/// The engine never owns this. When a tick reports a new interval, the
/// caller must [`reschedule`](Self::reschedule) so the real tick rate matches
/// the stored one.
#[derive(Debug, Clone, Default)]
pub struct TickScheduler {
    interval: Duration,
    next_due: Option<Instant>,
}

impl TickScheduler {
    /// Creates a cancelled scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer; the first tick fires one interval after `now`.
    pub fn start(&mut self, interval_ms: u64, now: Instant) {
        self.interval = Duration::from_millis(interval_ms);
        self.next_due = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Cancels the pending deadline and restarts at a new interval.
    pub fn reschedule(&mut self, interval_ms: u64, now: Instant) {
        self.cancel();
        self.start(interval_ms, now);
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Interval the timer was last armed with.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left before the next tick, or `None` when cancelled.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    /// Returns true when a tick is due and arms the following one.
    ///
    /// Fires at most once per call. Missed deadlines are not replayed; the
    /// next deadline is measured from `now`.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}
