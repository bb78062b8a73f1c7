//! Deterministic clock for tests.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

/// Clock that advances by a fixed step every time it is read, so records
/// created back to back get strictly increasing timestamps.
pub struct SteppingClock {
    now: Mutex<DateTime<Utc>>,
    step: TimeDelta,
}

impl SteppingClock {
    pub fn new(start: DateTime<Utc>, step: TimeDelta) -> Self {
        Self {
            now: Mutex::new(start),
            step,
        }
    }

    /// A clock that never moves.
    pub fn frozen(at: DateTime<Utc>) -> Self {
        Self::new(at, TimeDelta::zero())
    }

    fn lock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut now = self.lock();
        let current = *now;
        *now = current + self.step;
        current
    }
}
