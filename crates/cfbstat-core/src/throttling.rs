use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use governor::middleware::StateInformationMiddleware;
use governor::nanos::Nanos;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

use crate::clock::{Clock, SleepReason};

/// Default spacing between request starts; keeps a client under ~6 req/s.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(170);

type DirectRateLimiter =
    RateLimiter<NotKeyed, InMemoryState, LimiterClock, StateInformationMiddleware>;

/// Reads governor's time from the client's [`Clock`].
#[derive(Clone)]
struct LimiterClock(Arc<dyn Clock>);

impl governor::clock::Clock for LimiterClock {
    type Instant = Nanos;

    fn now(&self) -> Self::Instant {
        Nanos::from(self.0.now())
    }
}

/// Enforces a minimum interval between outbound requests of one client.
///
/// Backed by a single-cell GCRA limiter whose period is the interval. The gate
/// is held across the sleep so concurrent callers sharing a client are
/// serialized onto the same cadence.
#[derive(Clone)]
pub struct Throttle {
    clock: Arc<dyn Clock>,
    min_interval: Duration,
    limiter: Option<Arc<DirectRateLimiter>>,
    gate: Arc<Mutex<()>>,
}

impl Throttle {
    /// A zero `min_interval` disables throttling.
    pub fn new(clock: Arc<dyn Clock>, min_interval: Duration) -> Self {
        let limiter = Quota::with_period(min_interval).map(|quota| {
            let quota = quota.allow_burst(NonZeroU32::MIN);
            Arc::new(
                RateLimiter::direct_with_clock(quota, &LimiterClock(clock.clone()))
                    .with_middleware::<StateInformationMiddleware>(),
            )
        });

        Self {
            clock,
            min_interval,
            limiter,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Blocks until the limiter admits one more request. Returns the time slept.
    pub fn acquire(&self) -> Duration {
        let Some(limiter) = &self.limiter else {
            return Duration::ZERO;
        };
        let _gate = self.gate.lock().expect("throttle gate is not poisoned");

        let mut waited = Duration::ZERO;
        let mut admitted = loop {
            match limiter.check() {
                Ok(snapshot) => break snapshot,
                Err(not_until) => {
                    let wait = not_until.wait_time_from(Nanos::from(self.clock.now()));
                    self.clock.sleep_for(SleepReason::Throttle, wait);
                    waited += wait;
                }
            }
        };

        // After an idle gap GCRA admits one spare cell; spend it so the next
        // start still waits a full interval.
        while admitted.remaining_burst_capacity() > 0 {
            match limiter.check() {
                Ok(snapshot) => admitted = snapshot,
                Err(_) => break,
            }
        }
        waited
    }
}

impl std::fmt::Debug for Throttle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("min_interval", &self.min_interval)
            .finish_non_exhaustive()
    }
}
