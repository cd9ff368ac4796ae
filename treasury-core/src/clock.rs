//! Time injection for the treasury core.
//!
//! The core never reads the wall clock itself for anything that affects
//! proposal or policy decisions (audit-log entry timestamps are the one
//! deliberate exception, stamped with the real wall clock at append time).
//! Every operation that depends on "now" receives it explicitly, either as
//! a bare `DateTime<Utc>` argument or through a [`Clock`] implementation
//! supplied by the caller.

use chrono::{DateTime, Utc};

/// A source of the current time.
///
/// Implement this to drive the treasury deterministically in tests, or use
/// [`SystemClock`] to read the real wall clock from the enclosing shell.
///
/// # Example
/// ```
/// use treasury_core::clock::{Clock, FixedClock};
/// use chrono::{TimeZone, Utc};
///
/// let t0 = Utc.timestamp_opt(0, 0).unwrap();
/// let clock = FixedClock::new(t0);
/// assert_eq!(clock.now(), t0);
/// ```
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant, advanced manually. Used by tests that need
/// reproducible scenarios ("sign at t=0, execute at t=3601").
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    current: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { current: start }
    }

    /// Advance the clock by the given number of seconds and return the new time.
    pub fn advance_seconds(&mut self, seconds: i64) -> DateTime<Utc> {
        self.current += chrono::Duration::seconds(seconds);
        self.current
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.current
    }
}
