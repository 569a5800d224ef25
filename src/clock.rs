//! Time sources for transaction timestamps

use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;
use std::fmt::Debug;

/// Supplies the timestamp stamped on each new transaction
pub trait Clock: Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Frozen time: every read returns the same instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    current_time: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(time: DateTime<Utc>) -> Self {
        Self { current_time: time }
    }

    /// Create a new FixedClock frozen at another instant
    pub fn with_time(&self, time: DateTime<Utc>) -> Self {
        Self { current_time: time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.current_time
    }
}

/// Deterministic clock that moves forward by `step` after every read.
///
/// Gives each recorded transaction a distinct, reproducible timestamp. Once
/// the next step would leave chrono's range the clock stays at the last
/// representable instant.
#[derive(Debug, Clone)]
pub struct SteppingClock {
    next: Cell<DateTime<Utc>>,
    step: Duration,
    reads: Cell<u64>,
}

impl SteppingClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next: Cell::new(start),
            step,
            reads: Cell::new(0),
        }
    }

    /// Number of timestamps handed out so far
    pub fn reads(&self) -> u64 {
        self.reads.get()
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let current = self.next.get();
        self.next
            .set(current.checked_add_signed(self.step).unwrap_or(current));
        self.reads.set(self.reads.get().saturating_add(1));
        current
    }
}
