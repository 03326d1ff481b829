//! Recording countdown
//!
//! A fixed-budget countdown that reports the remaining time at a fixed
//! interval and expires exactly once. It knows nothing about the button;
//! the owner decides what a tick means.

use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

/// Identifies one `start` call. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Output of [`RecordingTimer::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick {
        handle: TimerHandle,
        remaining: Duration,
    },
    Expired {
        handle: TimerHandle,
    },
}

impl TimerEvent {
    pub fn handle(&self) -> TimerHandle {
        match self {
            TimerEvent::Tick { handle, .. } | TimerEvent::Expired { handle } => *handle,
        }
    }
}

#[derive(Debug)]
struct Countdown {
    handle: TimerHandle,
    total: Duration,
    interval: Duration,
    started_at: Instant,
    /// Index of the next tick to deliver, starting at 1
    next_tick: u32,
}

impl Countdown {
    fn expires_at(&self) -> Instant {
        self.started_at + self.total
    }

    /// Number of whole intervals in the budget, rounded to nearest
    ///
    /// A truncated interval leaves the last tick a few nanoseconds short of
    /// expiry; rounding keeps that tick counted as the expiry itself.
    fn tick_count(&self) -> u128 {
        let interval = self.interval.as_nanos();
        (self.total.as_nanos() + interval / 2) / interval
    }

    /// Offset of tick `n` from the start, or None once it would reach expiry
    fn tick_offset(&self, n: u32) -> Option<Duration> {
        if self.interval.is_zero() || u128::from(n) >= self.tick_count() {
            return None;
        }
        self.interval
            .checked_mul(n)
            .filter(|offset| *offset < self.total)
    }

    fn next_deadline(&self) -> Instant {
        match self.tick_offset(self.next_tick) {
            Some(offset) => self.started_at + offset,
            None => self.expires_at(),
        }
    }
}

/// Drives at most one countdown at a time
#[derive(Debug, Default)]
pub struct RecordingTimer {
    generation: u64,
    active: Option<Countdown>,
}

impl RecordingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a countdown of `total`, ticking every `interval`
    ///
    /// Any countdown already running is cancelled first.
    pub fn start(&mut self, total: Duration, interval: Duration, now: Instant) -> TimerHandle {
        if let Some(prev) = self.active.take() {
            trace!(handle = ?prev.handle, "countdown superseded");
        }

        self.generation += 1;
        let handle = TimerHandle(self.generation);

        trace!(
            ?handle,
            total_ms = total.as_millis() as u64,
            interval_us = interval.as_micros() as u64,
            "countdown started"
        );

        self.active = Some(Countdown {
            handle,
            total,
            interval,
            started_at: now,
            next_tick: 1,
        });
        handle
    }

    /// Stop the running countdown, if any. Safe to call at any time.
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some(countdown) => {
                trace!(handle = ?countdown.handle, "countdown cancelled");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Whether `handle` is the countdown currently running
    pub fn is_current(&self, handle: TimerHandle) -> bool {
        self.active.as_ref().is_some_and(|c| c.handle == handle)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.active.as_ref().map(Countdown::next_deadline)
    }

    /// Deliver whatever is due at `now`
    ///
    /// Missed ticks are coalesced into the latest one. Expiry is delivered
    /// exactly once, after which the timer is inert until restarted.
    pub fn poll(&mut self, now: Instant) -> Vec<TimerEvent> {
        let Some(countdown) = self.active.as_mut() else {
            return Vec::new();
        };
        let handle = countdown.handle;

        if now >= countdown.expires_at() {
            self.active = None;
            return vec![TimerEvent::Expired { handle }];
        }

        let mut due = None;
        while let Some(offset) = countdown.tick_offset(countdown.next_tick) {
            if countdown.started_at + offset > now {
                break;
            }
            due = Some(offset);
            countdown.next_tick += 1;
        }

        match due {
            Some(offset) => vec![TimerEvent::Tick {
                handle,
                remaining: countdown.total - offset,
            }],
            None => Vec::new(),
        }
    }
}
