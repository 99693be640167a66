//! Injectable time sources.
//!
//! All duration math runs on `MonotonicClock` readings, so wall-clock
//! adjustments can never skew a running stopwatch or countdown. The
//! world clock reads wall time through `WallClock` and samples it once
//! per refresh, so every zone in a snapshot renders the same instant.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// Strictly non-decreasing time source.
pub trait MonotonicClock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time source for rendering the current time of day.
pub trait WallClock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Real clocks backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl MonotonicClock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl WallClock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Controllable clock for tests. Cloned handles share the same time.
#[derive(Clone)]
pub struct FakeClock {
    inner: Arc<Mutex<FakeNow>>,
}

struct FakeNow {
    instant: Instant,
    utc: DateTime<Utc>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeNow {
                instant: Instant::now(),
                utc: Utc::now(),
            })),
        }
    }

    /// Move both the monotonic and wall readings forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.inner.lock().unwrap();
        now.instant += by;
        now.utc += chrono::Duration::from_std(by).expect("advance out of chrono range");
    }

    /// Pin the wall reading to a specific instant.
    pub fn set_utc(&self, utc: DateTime<Utc>) {
        self.inner.lock().unwrap().utc = utc;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for FakeClock {
    fn now(&self) -> Instant {
        self.inner.lock().unwrap().instant
    }
}

impl WallClock for FakeClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.inner.lock().unwrap().utc
    }
}
