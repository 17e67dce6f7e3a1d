//! Review timing and the injectable time source.
//!
//! The backoff is a fixed lookup table, not an adaptive model: each
//! consecutive correct answer pushes the next review further out until the
//! table saturates at 24 hours.

use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use tokio::sync::watch;

/// Base unit the backoff multipliers are applied to.
pub const BASE_REVIEW_DELAY: Duration = Duration::minutes(2);

/// Delay before an item answered wrong becomes due again.
pub const WRONG_ANSWER_DELAY: Duration = Duration::minutes(2);

/// Backoff multipliers indexed by success streak.
pub const BACKOFF_MULTIPLIERS: [i32; 7] = [1, 5, 15, 30, 90, 240, 720];

/// How often [`spawn_ticker`] republishes the current time by default.
pub const DEFAULT_TICK_PERIOD: StdDuration = StdDuration::from_secs(30);

/// Compute when an item with `correct_count` consecutive successes is next
/// due, relative to `now`.
pub fn next_review_time(correct_count: u32, now: DateTime<Utc>) -> DateTime<Utc> {
    let index = (correct_count as usize).min(BACKOFF_MULTIPLIERS.len() - 1);
    now + BASE_REVIEW_DELAY * BACKOFF_MULTIPLIERS[index]
}

/// Source of "now" for every time-dependent decision.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time, truncated to the millisecond precision snapshots keep.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Republish `clock.now()` every `period` on a watch channel.
///
/// Intended for presentation layers that redraw "due" counts; the scheduler
/// itself always reads the clock directly. The task stops once every
/// receiver has been dropped. Must be called inside a Tokio runtime.
pub fn spawn_ticker(clock: Arc<dyn Clock>, period: StdDuration) -> watch::Receiver<DateTime<Utc>> {
    let (tx, rx) = watch::channel(clock.now());
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if tx.send(clock.now()).is_err() {
                        break;
                    }
                }
                _ = tx.closed() => break,
            }
        }
        tracing::debug!("clock ticker stopped");
    });
    rx
}
