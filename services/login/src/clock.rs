//! Wall-clock source consumed by the issuer, ledger and signing authority.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current instant as a JWT NumericDate (whole seconds).
    fn timestamp(&self) -> i64 {
        self.now().timestamp()
    }
}

/// System wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for deterministic expiry tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Create a clock frozen at the given unix timestamp.
    ///
    /// # Panics
    ///
    /// If `secs` is outside chrono's representable range.
    #[must_use]
    pub fn at_timestamp(secs: i64) -> Self {
        match DateTime::from_timestamp(secs, 0) {
            Some(start) => Self::new(start),
            None => panic!("timestamp {secs} is out of range for ManualClock"),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
