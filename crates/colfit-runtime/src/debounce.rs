//! Trailing-edge debounce for high-frequency resize triggers.
//!
//! Every trigger restarts the wait; the pending work fires once no trigger
//! has arrived for `delay`. Time is always passed in explicitly so the
//! schedule is deterministic under test.
//!
//! # Invariants
//!
//! - **Latest-wins**: a burst of triggers fires exactly once, after the last.
//! - **Cancel is total**: after [`Debouncer::cancel`] nothing fires until the
//!   next trigger.
//! - **Zero delay**: fires on the first poll after the trigger.

use std::time::{Duration, Instant};

#[inline]
fn duration_since_or_zero(now: Instant, earlier: Instant) -> Duration {
    now.checked_duration_since(earlier)
        .unwrap_or(Duration::ZERO)
}

/// Action returned by [`Debouncer::poll_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceAction {
    /// Nothing due.
    None,
    /// The quiet period elapsed; run the pending work now.
    Fire {
        /// Triggers folded into this firing.
        coalesced: u64,
        /// Time from the first trigger of the burst to the firing.
        waited: Duration,
    },
}

/// Restart-on-trigger debounce timer.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    /// Instant of the latest trigger.
    last_trigger: Option<Instant>,
    /// Instant of the first trigger in the current burst.
    window_start: Option<Instant>,
    /// Triggers in the current burst.
    coalesced: u64,
}

impl Debouncer {
    /// Create an idle debouncer.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_trigger: None,
            window_start: None,
            coalesced: 0,
        }
    }

    /// Quiet period required before firing.
    #[inline]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a trigger, restarting the quiet period.
    pub fn trigger_at(&mut self, now: Instant) {
        if self.window_start.is_none() {
            self.window_start = Some(now);
        }
        self.last_trigger = Some(now);
        self.coalesced = self.coalesced.saturating_add(1);
    }

    /// Drop any pending firing. Returns whether something was pending.
    pub fn cancel(&mut self) -> bool {
        let was_pending = self.is_pending();
        self.last_trigger = None;
        self.window_start = None;
        self.coalesced = 0;
        was_pending
    }

    /// Check whether the pending work is due, consuming it if so.
    pub fn poll_at(&mut self, now: Instant) -> DebounceAction {
        let Some(last) = self.last_trigger else {
            return DebounceAction::None;
        };
        if duration_since_or_zero(now, last) < self.delay {
            return DebounceAction::None;
        }

        let waited = self
            .window_start
            .map(|start| duration_since_or_zero(now, start))
            .unwrap_or(Duration::ZERO);
        let coalesced = self.coalesced;
        self.cancel();
        DebounceAction::Fire { coalesced, waited }
    }

    /// Time until the pending work is due (`None` when idle).
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        let last = self.last_trigger?;
        let elapsed = duration_since_or_zero(now, last);
        Some(self.delay.saturating_sub(elapsed))
    }

    /// Whether a firing is pending.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.last_trigger.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(60);

    #[test]
    fn new_debouncer_is_idle() {
        let mut d = Debouncer::new(DELAY);
        assert!(!d.is_pending());
        assert_eq!(d.poll_at(Instant::now()), DebounceAction::None);
        assert_eq!(d.time_until_fire(Instant::now()), None);
    }

    #[test]
    fn fires_after_quiet_period() {
        let mut d = Debouncer::new(DELAY);
        let base = Instant::now();
        d.trigger_at(base);

        assert_eq!(d.poll_at(base + Duration::from_millis(59)), DebounceAction::None);
        assert_eq!(
            d.poll_at(base + Duration::from_millis(60)),
            DebounceAction::Fire {
                coalesced: 1,
                waited: Duration::from_millis(60)
            }
        );
        assert!(!d.is_pending());
    }

    #[test]
    fn burst_restarts_timer_and_fires_once() {
        let mut d = Debouncer::new(DELAY);
        let base = Instant::now();
        for i in 0..5u64 {
            d.trigger_at(base + Duration::from_millis(i * 20));
            assert_eq!(
                d.poll_at(base + Duration::from_millis(i * 20 + 10)),
                DebounceAction::None
            );
        }

        // last trigger at 80ms, due at 140ms
        assert_eq!(d.poll_at(base + Duration::from_millis(139)), DebounceAction::None);
        let action = d.poll_at(base + Duration::from_millis(140));
        assert_eq!(
            action,
            DebounceAction::Fire {
                coalesced: 5,
                waited: Duration::from_millis(140)
            }
        );
        assert_eq!(d.poll_at(base + Duration::from_millis(500)), DebounceAction::None);
    }

    #[test]
    fn cancel_drops_pending() {
        let mut d = Debouncer::new(DELAY);
        let base = Instant::now();
        d.trigger_at(base);
        assert!(d.cancel());
        assert!(!d.cancel());
        assert_eq!(d.poll_at(base + DELAY * 2), DebounceAction::None);
    }

    #[test]
    fn time_until_fire_counts_down() {
        let mut d = Debouncer::new(DELAY);
        let base = Instant::now();
        d.trigger_at(base);
        assert_eq!(
            d.time_until_fire(base + Duration::from_millis(15)),
            Some(Duration::from_millis(45))
        );
        assert_eq!(
            d.time_until_fire(base + Duration::from_millis(90)),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn zero_delay_fires_on_next_poll() {
        let mut d = Debouncer::new(Duration::ZERO);
        let base = Instant::now();
        d.trigger_at(base);
        assert!(matches!(d.poll_at(base), DebounceAction::Fire { .. }));
    }

    #[test]
    fn poll_before_trigger_time_does_not_underflow() {
        let mut d = Debouncer::new(DELAY);
        let base = Instant::now() + Duration::from_secs(1);
        d.trigger_at(base);
        assert_eq!(d.poll_at(Instant::now()), DebounceAction::None);
    }
}
