// SPDX-License-Identifier: MIT

//! Clock abstraction for testable timing
//!
//! Wall time drives daily/weekly schedule math; a test clock advances
//! it deterministically.

use chrono::{Local, NaiveDateTime};

/// Source of wall-clock time.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Local wall-clock time, naive (no offset), for time-of-day schedules.
    fn wall(&self) -> NaiveDateTime;
}

/// Real system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn wall(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeClock;

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    /// Manually advanced clock for deterministic tests.
    #[derive(Debug, Clone)]
    pub struct FakeClock {
        wall: Arc<Mutex<NaiveDateTime>>,
    }

    impl FakeClock {
        /// Start at an arbitrary fixed wall time (a Monday morning).
        pub fn new() -> Self {
            #[allow(clippy::unwrap_used)]
            let wall = NaiveDateTime::parse_from_str("2026-01-05 08:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap();
            Self::at(wall)
        }

        /// Start at a specific wall time.
        pub fn at(wall: NaiveDateTime) -> Self {
            Self {
                wall: Arc::new(Mutex::new(wall)),
            }
        }

        /// Move wall time forward.
        pub fn advance(&self, d: Duration) {
            let mut wall = self.wall.lock();
            *wall += chrono::Duration::from_std(d).unwrap_or(chrono::Duration::zero());
        }
    }

    impl Default for FakeClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Clock for FakeClock {
        fn wall(&self) -> NaiveDateTime {
            *self.wall.lock()
        }
    }
}
