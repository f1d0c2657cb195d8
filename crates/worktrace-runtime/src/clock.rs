use chrono::{DateTime, Utc};

/// Source of the server-assigned timestamps every operation stamps onto its
/// event. Swapped out in tests so time can be scripted.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
