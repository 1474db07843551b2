//! Timestamp utilities
//!
//! Cache expiry and model calibration stamps go through the `Clock` trait
//! so tests can drive time deterministically instead of sleeping.

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current UTC timestamp
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time source
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced time source for tests
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a manual clock starting at the given instant
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Advance the clock by a duration
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().expect("clock lock poisoned");
        *current += by;
    }

    /// Set the clock to an absolute instant
    pub fn set(&self, to: DateTime<Utc>) {
        let mut current = self.current.lock().expect("clock lock poisoned");
        *current = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().expect("clock lock poisoned")
    }
}
