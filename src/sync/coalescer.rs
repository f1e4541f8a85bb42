//! Latest-wins redraw debouncer.
//!
//! Every submission (re)opens a quiet window. When the window elapses without
//! a new submission, `tick_at` yields the latest request exactly once.
//!
//! # Invariants
//!
//! - **Latest-wins**: the final request of a burst is never dropped while the
//!   coalescer is alive.
//! - **At most one flush per window**: superseded requests are discarded.
//! - **Quiet teardown**: `cancel` discards a pending request without flushing.

use std::time::{Duration, Instant};

use tracing::trace;

pub const DEFAULT_COALESCE_WINDOW: Duration = Duration::from_millis(20);

#[inline]
fn duration_since_or_zero(now: Instant, earlier: Instant) -> Duration {
    now.checked_duration_since(earlier)
        .unwrap_or(Duration::ZERO)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoalescerStats {
    pub submitted: u64,
    pub flushed: u64,
    /// Requests replaced by a later submission inside the same window.
    pub superseded: u64,
    pub cancelled: u64,
}

#[derive(Debug)]
pub struct RedrawCoalescer<T> {
    window: Duration,
    pending: Option<T>,
    last_submit: Option<Instant>,
    stats: CoalescerStats,
}

impl<T> RedrawCoalescer<T> {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            last_submit: None,
            stats: CoalescerStats::default(),
        }
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn submit(&mut self, request: T) {
        self.submit_at(request, Instant::now());
    }

    /// Replaces the pending request and restarts the window at `now`.
    pub fn submit_at(&mut self, request: T, now: Instant) {
        self.stats.submitted += 1;
        if self.pending.replace(request).is_some() {
            self.stats.superseded += 1;
            trace!(superseded = self.stats.superseded, "redraw request superseded");
        }
        self.last_submit = Some(now);
    }

    pub fn tick(&mut self) -> Option<T> {
        self.tick_at(Instant::now())
    }

    /// Returns the pending request once the window has elapsed since the last submission.
    pub fn tick_at(&mut self, now: Instant) -> Option<T> {
        let last_submit = self.last_submit?;
        if duration_since_or_zero(now, last_submit) < self.window {
            return None;
        }

        self.last_submit = None;
        let flushed = self.pending.take();
        if flushed.is_some() {
            self.stats.flushed += 1;
        }
        flushed
    }

    /// Time left before the pending request flushes, if any.
    #[must_use]
    pub fn time_until_flush(&self, now: Instant) -> Option<Duration> {
        self.pending.as_ref()?;
        let elapsed = duration_since_or_zero(now, self.last_submit?);
        Some(self.window.saturating_sub(elapsed))
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Discards the pending request without flushing it.
    pub fn cancel(&mut self) -> bool {
        self.last_submit = None;
        let dropped = self.pending.take().is_some();
        if dropped {
            self.stats.cancelled += 1;
        }
        dropped
    }

    #[must_use]
    pub fn stats(&self) -> CoalescerStats {
        self.stats
    }
}

impl<T> Default for RedrawCoalescer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_COALESCE_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::RedrawCoalescer;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn burst_flushes_latest_once() {
        let start = Instant::now();
        let mut coalescer = RedrawCoalescer::new(ms(20));

        coalescer.submit_at("r1", start);
        coalescer.submit_at("r2", start + ms(5));
        coalescer.submit_at("r3", start + ms(10));

        assert_eq!(coalescer.tick_at(start + ms(25)), None);
        assert_eq!(coalescer.tick_at(start + ms(30)), Some("r3"));
        assert_eq!(coalescer.tick_at(start + ms(100)), None);

        let stats = coalescer.stats();
        assert_eq!(stats.submitted, 3);
        assert_eq!(stats.superseded, 2);
        assert_eq!(stats.flushed, 1);
    }

    #[test]
    fn submission_inside_window_restarts_it() {
        let start = Instant::now();
        let mut coalescer = RedrawCoalescer::new(ms(20));
        coalescer.submit_at(1, start);
        assert_eq!(coalescer.time_until_flush(start + ms(15)), Some(ms(5)));

        coalescer.submit_at(2, start + ms(15));
        assert_eq!(coalescer.tick_at(start + ms(21)), None);
        assert_eq!(coalescer.time_until_flush(start + ms(21)), Some(ms(14)));
        assert_eq!(coalescer.tick_at(start + ms(35)), Some(2));
    }

    #[test]
    fn separate_windows_flush_separately_in_order() {
        let start = Instant::now();
        let mut coalescer = RedrawCoalescer::new(ms(20));
        coalescer.submit_at("a", start);
        assert_eq!(coalescer.tick_at(start + ms(20)), Some("a"));
        coalescer.submit_at("b", start + ms(40));
        assert_eq!(coalescer.tick_at(start + ms(60)), Some("b"));
    }

    #[test]
    fn cancel_discards_pending_without_flush() {
        let start = Instant::now();
        let mut coalescer = RedrawCoalescer::new(ms(20));
        coalescer.submit_at("late", start);

        assert!(coalescer.cancel());
        assert!(!coalescer.has_pending());
        assert_eq!(coalescer.tick_at(start + ms(50)), None);
        assert_eq!(coalescer.time_until_flush(start + ms(50)), None);
        assert_eq!(coalescer.stats().cancelled, 1);
    }
}
