//! Injectable time source.
//!
//! Every wait in the client (throttle spacing and retry backoff) goes through
//! [`Clock::sleep`], so tests can swap in [`ManualClock`] and assert exact
//! durations without real delays.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::UtcDateTime;

/// Why the client is waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SleepReason {
    /// Spacing between request starts.
    Throttle,
    /// Wait before retrying a failed attempt.
    Backoff,
}

/// Monotonic time plus a blocking sleep.
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock's origin. Only differences are meaningful.
    fn now(&self) -> Duration;

    /// Blocks the calling thread for `duration`.
    fn sleep(&self, duration: Duration);

    /// Sleep issued by the client on behalf of `reason`.
    fn sleep_for(&self, _reason: SleepReason, duration: Duration) {
        self.sleep(duration);
    }

    /// Wall-clock time used to stamp `fetched_at`.
    fn wall_time(&self) -> UtcDateTime {
        UtcDateTime::now()
    }
}

/// Production clock backed by [`Instant`] and [`std::thread::sleep`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

#[derive(Debug, Default)]
struct ManualState {
    elapsed: Duration,
    sleeps: Vec<(Option<SleepReason>, Duration)>,
}

/// Deterministic clock for tests.
///
/// `sleep` returns immediately, records the requested duration (tagged with its
/// [`SleepReason`] when one was given) and moves the clock forward by it.
/// `advance` moves time without recording a sleep.
#[derive(Debug)]
pub struct ManualClock {
    epoch: UtcDateTime,
    state: Mutex<ManualState>,
}

impl ManualClock {
    pub fn new(epoch: UtcDateTime) -> Self {
        Self {
            epoch,
            state: Mutex::new(ManualState::default()),
        }
    }

    pub fn advance(&self, duration: Duration) {
        let mut state = self.lock();
        state.elapsed += duration;
    }

    /// All sleep durations requested so far, oldest first.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.lock()
            .sleeps
            .iter()
            .map(|(_, duration)| *duration)
            .collect()
    }

    /// Sleeps issued for `reason` only, oldest first.
    pub fn sleeps_for(&self, reason: SleepReason) -> Vec<Duration> {
        self.lock()
            .sleeps
            .iter()
            .filter(|(tag, _)| *tag == Some(reason))
            .map(|(_, duration)| *duration)
            .collect()
    }

    fn record_sleep(&self, reason: Option<SleepReason>, duration: Duration) {
        let mut state = self.lock();
        state.sleeps.push((reason, duration));
        state.elapsed += duration;
    }

    pub fn elapsed(&self) -> Duration {
        self.lock().elapsed
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state
            .lock()
            .expect("manual clock lock is not poisoned")
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(UtcDateTime::from_offset_datetime(
            time::OffsetDateTime::UNIX_EPOCH,
        ))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.lock().elapsed
    }

    fn sleep(&self, duration: Duration) {
        self.record_sleep(None, duration);
    }

    fn sleep_for(&self, reason: SleepReason, duration: Duration) {
        self.record_sleep(Some(reason), duration);
    }

    fn wall_time(&self) -> UtcDateTime {
        self.epoch.saturating_add(self.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_records_sleeps_and_advances() {
        let clock = ManualClock::default();

        clock.sleep(Duration::from_secs(1));
        clock.advance(Duration::from_millis(250));
        clock.sleep(Duration::from_secs(2));

        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
        assert_eq!(clock.now(), Duration::from_millis(3_250));
    }

    #[test]
    fn manual_clock_separates_sleeps_by_reason() {
        let clock = ManualClock::default();

        clock.sleep_for(SleepReason::Throttle, Duration::from_millis(170));
        clock.sleep_for(SleepReason::Backoff, Duration::from_secs(1));
        clock.sleep(Duration::from_millis(5));

        assert_eq!(
            clock.sleeps_for(SleepReason::Backoff),
            vec![Duration::from_secs(1)]
        );
        assert_eq!(
            clock.sleeps_for(SleepReason::Throttle),
            vec![Duration::from_millis(170)]
        );
        assert_eq!(clock.sleeps().len(), 3);
    }

    #[test]
    fn manual_wall_time_tracks_elapsed_time() {
        let epoch = UtcDateTime::parse("2024-09-01T00:00:00Z").expect("valid");
        let clock = ManualClock::new(epoch);

        assert_eq!(clock.wall_time(), epoch);
        clock.advance(Duration::from_secs(60));
        assert_eq!(clock.wall_time().format_rfc3339(), "2024-09-01T00:01:00Z");
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
