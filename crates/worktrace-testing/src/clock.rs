//! Scripted time for deterministic derivation tests.

use std::cell::Cell;

use chrono::{DateTime, Duration, TimeZone, Utc};
use worktrace_runtime::Clock;

/// A clock that only moves when told to. Interior mutability so it can sit
/// behind the shared `Arc<dyn Clock>` the tracker holds while the test
/// keeps its own handle for advancing.
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// A fixed, arbitrary instant every test can share.
    pub fn epoch() -> Self {
        Self::at(Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap())
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: i64) {
        self.advance(Duration::milliseconds(ms));
    }

    pub fn set(&self, to: DateTime<Utc>) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}
